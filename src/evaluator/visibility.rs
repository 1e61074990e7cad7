use super::{Assignment, AttributeValue, trace_all};
use crate::error::EvaluationError;
use crate::schema::{
    Attribute, AttributeGroup, AttributeNode, Condition, MAX_CONDITION_DEPTH, NodeType, Operator,
    Solution,
};
use crate::trace::TraceFormatter;
use ahash::AHashMap;
use tracing::trace;

/// Longest chain of attributes and groups resolved through one another.
const MAX_DEPENDENCY_DEPTH: usize = 256;

/// Resolves which groups and attributes of a solution currently apply.
///
/// Unlike plain [`Condition::evaluate`], resolution is transitive: a condition that
/// reads an attribute which is itself hidden sees no value for it. Conditions that
/// end up depending on themselves are reported as a cycle. Condition trees nested
/// deeper than `MAX_CONDITION_DEPTH` and dependency chains longer than 256 links
/// are refused.
pub struct Visibility<'s> {
    attributes: Vec<(Option<usize>, &'s Attribute)>,
    groups: Vec<&'s AttributeGroup>,
    index: AHashMap<&'s str, usize>,
}

/// Outcome of a visibility resolution, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityReport {
    pub groups: Vec<String>,
    pub attributes: Vec<String>,
}

impl VisibilityReport {
    pub fn is_visible(&self, attribute_id: &str) -> bool {
        self.attributes.iter().any(|id| id == attribute_id)
    }

    pub fn is_group_visible(&self, name: &str) -> bool {
        self.groups.iter().any(|group| group == name)
    }
}

impl<'s> Visibility<'s> {
    pub fn new(solution: &'s Solution) -> Self {
        let mut attributes = Vec::new();
        let mut groups = Vec::new();
        for node in &solution.attributes {
            match node {
                AttributeNode::Attribute(attribute) => attributes.push((None, attribute)),
                AttributeNode::Group(group) => {
                    let g = groups.len();
                    groups.push(group);
                    attributes.extend(group.attributes.iter().map(|a| (Some(g), a)));
                }
            }
        }

        let mut index = AHashMap::new();
        for (i, &(_, attribute)) in attributes.iter().enumerate() {
            index.entry(attribute.id.as_str()).or_insert(i);
        }

        Self {
            attributes,
            groups,
            index,
        }
    }

    /// Resolves every group and attribute against `assignment`. When `node_type` is
    /// given, entries restricted to other node types are hidden.
    pub fn resolve(
        &self,
        assignment: &Assignment,
        node_type: Option<NodeType>,
    ) -> Result<VisibilityReport, EvaluationError> {
        let mut resolver = Resolver {
            visibility: self,
            assignment,
            node_type,
            attribute_states: vec![State::Pending; self.attributes.len()],
            group_states: vec![State::Pending; self.groups.len()],
            stack: Vec::new(),
        };

        let mut report = VisibilityReport::default();
        for (g, group) in self.groups.iter().enumerate() {
            if resolver.group_visible(g)? {
                report.groups.push(group.name.clone());
            }
        }
        for (i, (_, attribute)) in self.attributes.iter().enumerate() {
            if resolver.attribute_visible(i)? {
                report.attributes.push(attribute.id.clone());
            }
        }
        trace!(
            groups = report.groups.len(),
            attributes = report.attributes.len(),
            "resolved visibility"
        );
        Ok(report)
    }

    /// Explains a group's own conditions against `assignment` (non-transitive).
    pub fn explain_group(&self, name: &str, assignment: &Assignment) -> Option<String> {
        let group = self.groups.iter().find(|g| g.name == name)?;
        Some(explain(group.conditions.as_deref(), assignment))
    }

    /// Explains an attribute's own conditions against `assignment` (non-transitive).
    pub fn explain_attribute(&self, id: &str, assignment: &Assignment) -> Option<String> {
        let &i = self.index.get(id)?;
        Some(explain(self.attributes[i].1.conditions.as_deref(), assignment))
    }
}

fn explain(conditions: Option<&[Condition]>, assignment: &Assignment) -> String {
    match conditions {
        Some(conditions) if !conditions.is_empty() => {
            let (traces, outcome) = trace_all(conditions, assignment);
            format!("{} => {}", TraceFormatter::format_all(&traces), outcome)
        }
        _ => "unconditional => true".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Pending,
    InProgress,
    Resolved(bool),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Frame {
    Attribute(usize),
    Group(usize),
}

struct Resolver<'v, 's> {
    visibility: &'v Visibility<'s>,
    assignment: &'v Assignment,
    node_type: Option<NodeType>,
    attribute_states: Vec<State>,
    group_states: Vec<State>,
    stack: Vec<Frame>,
}

impl<'v, 's> Resolver<'v, 's> {
    fn attribute_visible(&mut self, i: usize) -> Result<bool, EvaluationError> {
        match self.attribute_states[i] {
            State::Resolved(visible) => return Ok(visible),
            State::InProgress => return Err(self.cycle_error(Frame::Attribute(i))),
            State::Pending => {}
        }
        self.enter()?;
        self.attribute_states[i] = State::InProgress;
        self.stack.push(Frame::Attribute(i));

        let (group, attribute) = self.visibility.attributes[i];
        let mut visible = match group {
            Some(g) => self.group_visible(g)?,
            None => true,
        };
        visible = visible
            && node_matches(attribute.node_types.as_deref(), self.node_type)
            && self.conditions_hold(attribute.conditions.as_deref())?;

        self.stack.pop();
        self.attribute_states[i] = State::Resolved(visible);
        Ok(visible)
    }

    fn group_visible(&mut self, g: usize) -> Result<bool, EvaluationError> {
        match self.group_states[g] {
            State::Resolved(visible) => return Ok(visible),
            State::InProgress => return Err(self.cycle_error(Frame::Group(g))),
            State::Pending => {}
        }
        self.enter()?;
        self.group_states[g] = State::InProgress;
        self.stack.push(Frame::Group(g));

        let group = self.visibility.groups[g];
        let visible = node_matches(group.node_types.as_deref(), self.node_type)
            && self.conditions_hold(group.conditions.as_deref())?;

        self.stack.pop();
        self.group_states[g] = State::Resolved(visible);
        Ok(visible)
    }

    fn enter(&self) -> Result<(), EvaluationError> {
        if self.stack.len() >= MAX_DEPENDENCY_DEPTH {
            return Err(EvaluationError::NestingTooDeep {
                limit: MAX_DEPENDENCY_DEPTH,
            });
        }
        Ok(())
    }

    fn conditions_hold(
        &mut self,
        conditions: Option<&[Condition]>,
    ) -> Result<bool, EvaluationError> {
        for condition in conditions.unwrap_or_default() {
            if !self.condition_holds(condition, 1)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn condition_holds(
        &mut self,
        condition: &Condition,
        depth: usize,
    ) -> Result<bool, EvaluationError> {
        if depth > MAX_CONDITION_DEPTH {
            return Err(EvaluationError::NestingTooDeep {
                limit: MAX_CONDITION_DEPTH,
            });
        }
        match condition {
            Condition::Leaf {
                attribute_id,
                attribute_value,
            } => Ok(self
                .read(attribute_id)?
                .is_some_and(|actual| actual.matches(attribute_value))),
            Condition::Group {
                operator: Operator::And,
                conditions,
            } => {
                for child in conditions {
                    if !self.condition_holds(child, depth + 1)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Group {
                operator: Operator::Or,
                conditions,
            } => {
                for child in conditions {
                    if self.condition_holds(child, depth + 1)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Reads an attribute's value as seen by other conditions: hidden attributes have none.
    fn read(&mut self, id: &str) -> Result<Option<AttributeValue>, EvaluationError> {
        let &i = self
            .visibility
            .index
            .get(id)
            .ok_or_else(|| EvaluationError::UnknownAttribute(id.to_string()))?;
        if self.attribute_visible(i)? {
            Ok(self.assignment.get(id).cloned())
        } else {
            Ok(None)
        }
    }

    fn cycle_error(&self, repeated: Frame) -> EvaluationError {
        let start = self
            .stack
            .iter()
            .position(|frame| *frame == repeated)
            .unwrap_or(0);
        let path = self.stack[start..]
            .iter()
            .chain(std::iter::once(&repeated))
            .map(|frame| self.label(*frame))
            .collect();
        EvaluationError::CyclicDependency { path }
    }

    fn label(&self, frame: Frame) -> String {
        match frame {
            Frame::Attribute(i) => self.visibility.attributes[i].1.id.clone(),
            Frame::Group(g) => format!("group '{}'", self.visibility.groups[g].name),
        }
    }
}

fn node_matches(filter: Option<&[NodeType]>, node_type: Option<NodeType>) -> bool {
    match (filter, node_type) {
        (Some(allowed), Some(node_type)) => allowed.contains(&node_type),
        _ => true,
    }
}
