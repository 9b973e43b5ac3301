use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use serde::{Deserialize, Serialize};

/// Placeholder stored for any missing column or cell.
pub const SENTINEL: &str = "N/A";

/// Picker value meaning "no constraint".
pub const ALL: &str = "All";

/// Rendering of an empty comment set.
pub const NO_COMMENT: &str = "No comment";

/// Delimiter between comment tags in the stored string.
pub const COMMENT_DELIMITER: &str = ", ";

pub const PRICE_LEVELS: [&str; 8] = [
    "$", "$-$$", "$$", "$$-$$$", "$$$", "$$$-$$$$", "$$$$", "Default",
];

/// Stable identity assigned to a record at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub usize);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    Verified,
    #[default]
    NotVerified,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Verified => "Verified",
            Status::NotVerified => "Not Verified",
        }
    }

    /// Anything other than the exact `Verified` label reads as not verified.
    pub fn parse(value: &str) -> Self {
        if value == "Verified" { Status::Verified } else { Status::NotVerified }
    }

    pub fn toggled(self) -> Self {
        match self {
            Status::Verified => Status::NotVerified,
            Status::NotVerified => Status::Verified,
        }
    }

    pub fn is_verified(self) -> bool {
        matches!(self, Status::Verified)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Evaluation {
    #[default]
    InitialValue,
    HighEnd,
    MidEnd,
    LowEnd,
}

impl Evaluation {
    pub const ALL: [Evaluation; 4] = [
        Evaluation::InitialValue,
        Evaluation::HighEnd,
        Evaluation::MidEnd,
        Evaluation::LowEnd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Evaluation::InitialValue => "Initial Value",
            Evaluation::HighEnd => "High-end",
            Evaluation::MidEnd => "Mid-end",
            Evaluation::LowEnd => "Low-end",
        }
    }

    /// Unknown labels fall back to `Initial Value`.
    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == value)
            .unwrap_or_default()
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|e| *e == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CommentTag {
    KeyAccount,
    NoWebsite,
    BadWebsite,
    GoodQuality,
    HighPrices,
    LowEngagement,
    StrongPresence,
    InnovativeConcept,
    OutdatedDesign,
    Industrial,
    LimitedReach,
    PremiumPackaging,
}

impl CommentTag {
    pub const ALL: [CommentTag; 12] = [
        CommentTag::KeyAccount,
        CommentTag::NoWebsite,
        CommentTag::BadWebsite,
        CommentTag::GoodQuality,
        CommentTag::HighPrices,
        CommentTag::LowEngagement,
        CommentTag::StrongPresence,
        CommentTag::InnovativeConcept,
        CommentTag::OutdatedDesign,
        CommentTag::Industrial,
        CommentTag::LimitedReach,
        CommentTag::PremiumPackaging,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommentTag::KeyAccount => "Key Account",
            CommentTag::NoWebsite => "No Website",
            CommentTag::BadWebsite => "Bad Website",
            CommentTag::GoodQuality => "Good Quality",
            CommentTag::HighPrices => "High Prices",
            CommentTag::LowEngagement => "Low Engagement",
            CommentTag::StrongPresence => "Strong Presence",
            CommentTag::InnovativeConcept => "Innovative Concept",
            CommentTag::OutdatedDesign => "Outdated Design",
            CommentTag::Industrial => "Industrial",
            CommentTag::LimitedReach => "Limited Reach",
            CommentTag::PremiumPackaging => "Premium Packaging",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == label)
    }
}

/// A subset of the comment tags, ordered by enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentSet(BTreeSet<CommentTag>);

impl CommentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a stored comment string.
    ///
    /// An empty string or `No comment` yields the empty set. Tokens that are
    /// not known tags are dropped.
    pub fn parse(stored: &str) -> Self {
        let stored = stored.trim();
        if stored.is_empty() || stored == NO_COMMENT {
            return Self::default();
        }
        Self(
            stored
                .split(COMMENT_DELIMITER)
                .filter_map(|token| CommentTag::from_label(token.trim()))
                .collect(),
        )
    }

    pub fn contains(&self, tag: CommentTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn insert(&mut self, tag: CommentTag) {
        self.0.insert(tag);
    }

    pub fn toggle(&mut self, tag: CommentTag) {
        if !self.0.remove(&tag) {
            self.0.insert(tag);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = CommentTag> + '_ {
        self.0.iter().copied()
    }

    /// The delimited string committed to the table.
    pub fn to_stored(&self) -> String {
        if self.0.is_empty() {
            return NO_COMMENT.to_string();
        }
        self.0
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(COMMENT_DELIMITER)
    }
}

impl FromIterator<CommentTag> for CommentSet {
    fn from_iter<I: IntoIterator<Item = CommentTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The plain-text fields every record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextField {
    Company,
    Activity,
    Address,
    City,
    Phone,
    PriceLevel,
    WebUrl,
    Tag,
}

impl TextField {
    pub const ALL: [TextField; 8] = [
        TextField::Company,
        TextField::Activity,
        TextField::Address,
        TextField::City,
        TextField::Phone,
        TextField::PriceLevel,
        TextField::WebUrl,
        TextField::Tag,
    ];

    /// Header name in the source and exported sheet.
    pub fn header(self) -> &'static str {
        match self {
            TextField::Company => "company",
            TextField::Activity => "Activity",
            TextField::Address => "Adress",
            TextField::City => "city",
            TextField::Phone => "phone",
            TextField::PriceLevel => "priceLevel",
            TextField::WebUrl => "webUrl",
            TextField::Tag => "Valrhona Yes/No",
        }
    }
}

/// Columns of the closed record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Id,
    Text(TextField),
    Status,
    Evaluation,
    Comment,
}

impl Field {
    pub fn header(self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Text(text) => text.header(),
            Field::Status => "Status",
            Field::Evaluation => "Evaluating",
            Field::Comment => "Comment",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        match header {
            "ID" => Some(Field::Id),
            "Status" => Some(Field::Status),
            "Evaluating" => Some(Field::Evaluation),
            "Comment" => Some(Field::Comment),
            other => TextField::ALL
                .into_iter()
                .find(|t| t.header() == other)
                .map(Field::Text),
        }
    }

    /// Fields in the order they are appended when absent from the source.
    pub fn canonical() -> impl Iterator<Item = Field> {
        TextField::ALL
            .into_iter()
            .map(Field::Text)
            .chain([Field::Status, Field::Evaluation, Field::Comment])
    }
}

/// A single write to one field of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(TextField, String),
    Status(Status),
    Evaluation(Evaluation),
    Comment(String),
}

/// One business entity row plus its workflow metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub company: String,
    pub activity: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub price_level: String,
    pub web_url: String,
    pub tag: String,
    /// Stored verbatim; [`Record::status`] reads it as a [`Status`].
    pub status: String,
    /// Stored verbatim; [`Record::evaluation`] reads it as an [`Evaluation`].
    pub evaluation: String,
    pub comment: String,
    /// Values of source columns outside the schema, aligned with the table's extra headers.
    pub extra: Vec<String>,
}

impl Record {
    /// A record with every text field set to the sentinel and default workflow values.
    pub fn blank(id: RecordId) -> Self {
        Self {
            id,
            company: SENTINEL.to_string(),
            activity: SENTINEL.to_string(),
            address: SENTINEL.to_string(),
            city: SENTINEL.to_string(),
            phone: SENTINEL.to_string(),
            price_level: SENTINEL.to_string(),
            web_url: SENTINEL.to_string(),
            tag: SENTINEL.to_string(),
            status: Status::default().as_str().to_string(),
            evaluation: Evaluation::default().as_str().to_string(),
            comment: NO_COMMENT.to_string(),
            extra: Vec::new(),
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Company => &self.company,
            TextField::Activity => &self.activity,
            TextField::Address => &self.address,
            TextField::City => &self.city,
            TextField::Phone => &self.phone,
            TextField::PriceLevel => &self.price_level,
            TextField::WebUrl => &self.web_url,
            TextField::Tag => &self.tag,
        }
    }

    pub fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Company => &mut self.company,
            TextField::Activity => &mut self.activity,
            TextField::Address => &mut self.address,
            TextField::City => &mut self.city,
            TextField::Phone => &mut self.phone,
            TextField::PriceLevel => &mut self.price_level,
            TextField::WebUrl => &mut self.web_url,
            TextField::Tag => &mut self.tag,
        }
    }

    /// Textual value of a schema field, as exported.
    pub fn value(&self, field: Field) -> Cow<'_, str> {
        match field {
            Field::Id => Cow::Owned(self.id.to_string()),
            Field::Text(text) => Cow::Borrowed(self.text(text)),
            Field::Status => Cow::Borrowed(&self.status),
            Field::Evaluation => Cow::Borrowed(&self.evaluation),
            Field::Comment => Cow::Borrowed(&self.comment),
        }
    }

    pub fn apply(&mut self, value: FieldValue) {
        match value {
            FieldValue::Text(field, text) => *self.text_mut(field) = text,
            FieldValue::Status(status) => self.status = status.as_str().to_string(),
            FieldValue::Evaluation(evaluation) => self.evaluation = evaluation.as_str().to_string(),
            FieldValue::Comment(comment) => self.comment = comment,
        }
    }

    pub fn status(&self) -> Status {
        Status::parse(&self.status)
    }

    pub fn evaluation(&self) -> Evaluation {
        Evaluation::parse(&self.evaluation)
    }

    pub fn comments(&self) -> CommentSet {
        CommentSet::parse(&self.comment)
    }

    /// Phone as shown to the user: numbers starting with `9` get a leading `+`.
    pub fn display_phone(&self) -> Cow<'_, str> {
        display_phone(&self.phone)
    }
}

pub fn display_phone(phone: &str) -> Cow<'_, str> {
    if phone.starts_with('9') {
        Cow::Owned(format!("+{phone}"))
    } else {
        Cow::Borrowed(phone)
    }
}
