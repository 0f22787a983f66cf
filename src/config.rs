/// Options for reading a stream of games.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Config {
    /// Whether to build [`AnnotatedGame`](crate::AnnotatedGame)s with
    /// variations and comments instead of flat
    /// [`SimpleGame`](crate::SimpleGame)s.
    ///
    /// Defaults to `false`.
    pub annotations: bool,
}

impl Config {
    pub fn with_annotations(mut self, annotations: bool) -> Config {
        self.annotations = annotations;
        self
    }
}
