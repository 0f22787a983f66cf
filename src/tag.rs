use std::borrow::Cow;

/// Names of the Seven Tag Roster, in export order.
pub const SEVEN_TAG_ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

/// The tag pairs of a game, like `[White "Deep Blue"]`.
///
/// The Seven Tag Roster and `FEN` have dedicated fields. Missing roster tags
/// hold the usual PGN placeholders (`?`, `????.??.??` and `*`). All other
/// tags are kept in the order they were first seen. `SetUp` is not stored:
/// it is implied by the presence of a FEN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Headers {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
    pub result: String,
    pub fen: Option<String>,
    others: Vec<(String, String)>,
}

impl Default for Headers {
    fn default() -> Headers {
        Headers {
            event: "?".to_owned(),
            site: "?".to_owned(),
            date: "????.??.??".to_owned(),
            round: "?".to_owned(),
            white: "?".to_owned(),
            black: "?".to_owned(),
            result: "*".to_owned(),
            fen: None,
            others: Vec::new(),
        }
    }
}

impl Headers {
    pub fn new() -> Headers {
        Headers::default()
    }

    /// Gets the value of a tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use pgn_tree::Headers;
    ///
    /// let mut headers = Headers::new();
    /// headers.set("Annotator", "Fritz");
    ///
    /// assert_eq!(headers.get("Annotator"), Some("Fritz"));
    /// assert_eq!(headers.get("Date"), Some("????.??.??"));
    /// assert_eq!(headers.get("ECO"), None);
    /// ```
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "Event" => Some(self.event.as_str()),
            "Site" => Some(self.site.as_str()),
            "Date" => Some(self.date.as_str()),
            "Round" => Some(self.round.as_str()),
            "White" => Some(self.white.as_str()),
            "Black" => Some(self.black.as_str()),
            "Result" => Some(self.result.as_str()),
            "FEN" => self.fen.as_deref(),
            "SetUp" | "Setup" => self.fen.as_ref().map(|_| "1"),
            _ => self
                .others
                .iter()
                .find(|(other, _)| other == name)
                .map(|(_, value)| value.as_str()),
        }
    }

    /// Sets the value of a tag, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match name.as_str() {
            "Event" => self.event = value,
            "Site" => self.site = value,
            "Date" => self.date = value,
            "Round" => self.round = value,
            "White" => self.white = value,
            "Black" => self.black = value,
            "Result" => self.result = value,
            "FEN" => self.fen = Some(value),
            "SetUp" | "Setup" => (),
            _ => match self.others.iter_mut().find(|(other, _)| *other == name) {
                Some((_, old)) => *old = value,
                None => self.others.push((name, value)),
            },
        }
    }

    /// Tags other than the Seven Tag Roster, `FEN` and `SetUp`, in
    /// insertion order.
    pub fn others(&self) -> impl Iterator<Item = (&str, &str)> {
        self.others
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// All tags in export order: the Seven Tag Roster, `FEN` if present,
    /// then all other tags.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let roster = [
            &self.event,
            &self.site,
            &self.date,
            &self.round,
            &self.white,
            &self.black,
            &self.result,
        ];
        SEVEN_TAG_ROSTER
            .into_iter()
            .zip(roster.into_iter().map(String::as_str))
            .chain(self.fen.as_deref().map(|fen| ("FEN", fen)))
            .chain(self.others())
    }
}

/// Escapes backslashes and quotes for use in a tag value. Allocates only
/// when the value actually contains such characters.
///
/// > A quote inside a string is represented by the backslash immediately
/// > followed by a quote. A backslash inside a string is represented by
/// > two adjacent backslashes.
pub fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '"']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        if ch == '\\' || ch == '"' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    Cow::Owned(escaped)
}

#[cfg(feature = "serde")]
impl serde::Serialize for Headers {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert!(matches!(escape("Hello world"), Cow::Borrowed("Hello world")));
        assert_eq!(escape("Quote \" Test"), "Quote \\\" Test");
        assert_eq!(escape("\\Hello \"world\\"), "\\\\Hello \\\"world\\\\");
    }

    #[test]
    fn test_duplicates_keep_position() {
        let mut headers = Headers::new();
        headers.set("ECO", "C20");
        headers.set("Annotator", "me");
        headers.set("ECO", "C21");
        headers.set("White", "Kasparov");
        headers.set("White", "Karpov");

        assert_eq!(headers.white, "Karpov");
        assert_eq!(
            headers.others().collect::<Vec<_>>(),
            [("ECO", "C21"), ("Annotator", "me")]
        );
    }

    #[test]
    fn test_setup_is_derived() {
        let mut headers = Headers::new();
        headers.set("SetUp", "1");
        assert_eq!(headers.get("SetUp"), None);
        assert_eq!(headers.others().count(), 0);

        headers.set("FEN", "8/8/8/8/8/8/8/K1k5 w - - 0 1");
        assert_eq!(headers.get("Setup"), Some("1"));
    }

    #[test]
    fn test_iter_order() {
        let mut headers = Headers::new();
        headers.set("PlyCount", "0");
        headers.set("FEN", "8/8/8/8/8/8/8/K1k5 w - - 0 1");
        let names: Vec<_> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            ["Event", "Site", "Date", "Round", "White", "Black", "Result", "FEN", "PlyCount"]
        );
    }
}
