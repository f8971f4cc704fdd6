use std::fmt;

/// Component tags a card template may use.
///
/// Plain HTML elements render as-is; the `I*` tags are interactive widgets and
/// must declare an [`InteractionMode`] through their `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Div,
    P,
    Span,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Img,
    A,
    Button,
    IText,
    IBool,
    IChoice,
    IToggle,
    IMultiline,
    IButton,
    IVButton,
}

impl Tag {
    pub const ALL: [Tag; 19] = [
        Tag::Div,
        Tag::P,
        Tag::Span,
        Tag::H1,
        Tag::H2,
        Tag::H3,
        Tag::H4,
        Tag::H5,
        Tag::H6,
        Tag::Img,
        Tag::A,
        Tag::Button,
        Tag::IText,
        Tag::IBool,
        Tag::IChoice,
        Tag::IToggle,
        Tag::IMultiline,
        Tag::IButton,
        Tag::IVButton,
    ];

    /// Looks up a tag by its exact (case-sensitive) name.
    pub fn parse(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::P => "p",
            Tag::Span => "span",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::H5 => "h5",
            Tag::H6 => "h6",
            Tag::Img => "img",
            Tag::A => "a",
            Tag::Button => "button",
            Tag::IText => "Itext",
            Tag::IBool => "IBool",
            Tag::IChoice => "IChoice",
            Tag::IToggle => "IToggle",
            Tag::IMultiline => "Imultiline",
            Tag::IButton => "Ibutton",
            Tag::IVButton => "I_V_Button",
        }
    }

    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            Tag::IText
                | Tag::IBool
                | Tag::IChoice
                | Tag::IToggle
                | Tag::IMultiline
                | Tag::IButton
                | Tag::IVButton
        )
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the `type` field of an interactive component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Editable,
    Display,
}

impl InteractionMode {
    pub fn parse(value: &str) -> Option<InteractionMode> {
        match value {
            "Editable" => Some(InteractionMode::Editable),
            "display" => Some(InteractionMode::Display),
            _ => None,
        }
    }
}
