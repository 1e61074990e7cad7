use ahash::AHashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Defines the closed `NodeType` enum together with its name table and lookup index.
macro_rules! define_node_types {
    ( $( $variant:ident ),* $(,)? ) => {
        /// A kind of visual node an attribute or group can be attached to.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum NodeType {
            $( $variant, )*
        }

        impl NodeType {
            /// Every node type, in declaration order.
            pub const ALL: &'static [NodeType] = &[ $( NodeType::$variant, )* ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( NodeType::$variant => stringify!($variant), )*
                }
            }
        }
    };
}

define_node_types! {
    BackgroundVideoWrapper,
    Block,
    Blockquote,
    Body,
    FormCheckboxWrapper,
    FormCheckboxInput,
    Container,
    Column,
    CommerceCartWrapper,
    CommerceCartOpenLink,
    CommerceCartOpenLinkIcon,
    DropdownLink,
    DropdownList,
    DropdownToggle,
    DropdownWrapper,
    DynamoEmpty,
    DynamoItem,
    DynamoList,
    DynamoWrapper,
    Facebook,
    Grid,
    HtmlEmbed,
    Heading,
    Icon,
    Image,
    FormTextInput,
    FormWrapper,
    FormForm,
    FormInlineLabel,
    FormSuccessMessage,
    FormErrorMessage,
    FormBlockLabel,
    LineBreak,
    Link,
    List,
    ListItem,
    LightboxWrapper,
    MapWidget,
    NavbarWrapper,
    NavbarContainer,
    NavbarBrand,
    NavbarMenu,
    NavbarLink,
    NavbarButton,
    Paragraph,
    FormRadioWrapper,
    FormRadioInput,
    FormReCaptcha,
    RichText,
    Row,
    FormSelect,
    SearchButton,
    SearchForm,
    SearchInput,
    Span,
    Strong,
    Symbol,
    Section,
    FormButton,
    SliderWrapper,
    SliderMask,
    SliderSlide,
    SliderArrow,
    SliderNav,
    TabsWrapper,
    TabsMenu,
    TabsLink,
    TabsContent,
    TabsPane,
    FormTextarea,
    Twitter,
    Video,
    YouTubeVideo,
}

/// Name -> variant index, built once per process.
static NODE_TYPE_INDEX: Lazy<AHashMap<&'static str, NodeType>> = Lazy::new(|| {
    NodeType::ALL
        .iter()
        .map(|node_type| (node_type.as_str(), *node_type))
        .collect()
});

impl NodeType {
    /// Resolves a node type by its exact (case-sensitive) name.
    pub fn lookup(name: &str) -> Option<NodeType> {
        NODE_TYPE_INDEX.get(name).copied()
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::lookup(s).ok_or_else(|| format!("unknown nodeType '{}'", s))
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
