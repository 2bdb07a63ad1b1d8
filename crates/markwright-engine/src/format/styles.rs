use serde::{Deserialize, Serialize};

/// Delimiter character used for bold and italic spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisStyle {
    #[default]
    Asterisk,
    Underscore,
}

impl EmphasisStyle {
    pub fn char(self) -> char {
        match self {
            EmphasisStyle::Asterisk => '*',
            EmphasisStyle::Underscore => '_',
        }
    }
}

/// Bullet used for unordered and task list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletListStyle {
    #[default]
    Minus,
    Asterisk,
    Plus,
}

impl BulletListStyle {
    pub fn char(self) -> char {
        match self {
            BulletListStyle::Minus => '-',
            BulletListStyle::Asterisk => '*',
            BulletListStyle::Plus => '+',
        }
    }
}

/// Character following the number of an ordered list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderedListStyle {
    #[default]
    Dot,
    Parenthesis,
}

impl OrderedListStyle {
    pub fn char(self) -> char {
        match self {
            OrderedListStyle::Dot => '.',
            OrderedListStyle::Parenthesis => ')',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeFenceStyle {
    #[default]
    Backtick,
    Tilde,
}

impl CodeFenceStyle {
    pub fn char(self) -> char {
        match self {
            CodeFenceStyle::Backtick => '`',
            CodeFenceStyle::Tilde => '~',
        }
    }
}

/// Numeral base of `&#...;` character references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharReferenceFormat {
    #[default]
    Hexadecimal,
    Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalRuleStyle {
    #[default]
    Hyphen,
    Asterisk,
    Underscore,
}

impl HorizontalRuleStyle {
    pub fn char(self) -> char {
        match self {
            HorizontalRuleStyle::Hyphen => '-',
            HorizontalRuleStyle::Asterisk => '*',
            HorizontalRuleStyle::Underscore => '_',
        }
    }
}

/// Alignment declared for a table column.
///
/// `None` pads like `Left` but renders the plain `---` separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}
