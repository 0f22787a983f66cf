use std::{fmt, iter::FusedIterator};

use shakmaty::{san::SanPlus, Chess, Move, Position};

use crate::{game::GameBuilder, tag::Headers, writer};

/// Index of a node in an [`AnnotatedGame`].
///
/// Only meaningful for the game that created it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    const ROOT: NodeId = NodeId(0);
}

/// A position in the game tree, reached by playing [`Node::move_played()`]
/// from the parent.
#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    /// The first child continues the line, all others are variations.
    children: Vec<NodeId>,
    m: Option<Move>,
    board: Chess,
    precomment: Option<String>,
    comment: Option<String>,
}

impl Node {
    fn new(parent: Option<NodeId>, m: Option<Move>, board: Chess) -> Node {
        Node {
            parent,
            children: Vec::new(),
            m,
            board,
            precomment: None,
            comment: None,
        }
    }

    /// `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Alternatives to the main continuation.
    pub fn variations(&self) -> &[NodeId] {
        self.children.get(1..).unwrap_or_default()
    }

    /// The move leading to this node. `None` for the root.
    pub fn move_played(&self) -> Option<&Move> {
        self.m.as_ref()
    }

    /// The position after the move.
    pub fn board(&self) -> &Chess {
        &self.board
    }

    pub fn precomment(&self) -> Option<&str> {
        self.precomment.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A game tree with variations and comments, and a cursor pointing at one
/// of its nodes.
///
/// Nodes live in an arena and are never removed, so a [`NodeId`] stays
/// valid for the lifetime of the game.
///
/// # Examples
///
/// ```
/// use pgn_tree::game_from_str;
///
/// let game = game_from_str("1. e4 (1. d4 d5) e5 *", true)?;
/// let tree = game.as_annotated().unwrap();
///
/// let root = tree.node(tree.root());
/// assert_eq!(root.children().len(), 2);
///
/// let mainline: Vec<_> = tree
///     .mainline()
///     .filter_map(|id| tree.san(id))
///     .map(|san| san.to_string())
///     .collect();
/// assert_eq!(mainline, ["e4", "e5"]);
/// # Ok::<_, pgn_tree::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AnnotatedGame {
    headers: Headers,
    nodes: Vec<Node>,
    current: NodeId,
}

impl Default for AnnotatedGame {
    fn default() -> AnnotatedGame {
        AnnotatedGame::new(Headers::default(), Chess::default())
    }
}

impl AnnotatedGame {
    pub fn new(headers: Headers, start: Chess) -> AnnotatedGame {
        AnnotatedGame {
            headers,
            nodes: vec![Node::new(None, None, start)],
            current: NodeId::ROOT,
        }
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// The node holding the starting position.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// The cursor.
    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Gets a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to a different game with more nodes.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of moves in the tree, over all variations.
    pub fn num_moves(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn start_board(&self) -> &Chess {
        &self.nodes[0].board
    }

    /// The position at the cursor.
    pub fn board(&self) -> &Chess {
        &self.node(self.current).board
    }

    /// The move leading to `id` in SAN, with check and checkmate suffixes.
    pub fn san(&self, id: NodeId) -> Option<SanPlus> {
        let node = self.get(id)?;
        let m = node.m.as_ref()?;
        let before = self.node(node.parent?).board.clone();
        Some(SanPlus::from_move(before, m.clone()))
    }

    /// The nodes of the main line, starting with the first move.
    pub fn mainline(&self) -> Mainline<'_> {
        Mainline {
            game: self,
            next: self.nodes[0].children.first().copied(),
        }
    }

    /// Plays a move from the cursor, adding it as the last child, and moves
    /// the cursor to the new node.
    ///
    /// The move must be legal in [`AnnotatedGame::board()`].
    pub fn add_move(&mut self, m: Move) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut board = self.board().clone();
        board.play_unchecked(m.clone());
        self.nodes.push(Node::new(Some(self.current), Some(m), board));
        self.nodes[self.current.0].children.push(id);
        self.current = id;
        id
    }

    /// Adds a comment before the move at the cursor.
    pub fn add_pre_comment(&mut self, comment: String) {
        let current = self.current.0;
        append_comment(&mut self.nodes[current].precomment, comment);
    }

    /// Adds a comment after the move at the cursor.
    pub fn add_comment(&mut self, comment: String) {
        let current = self.current.0;
        append_comment(&mut self.nodes[current].comment, comment);
    }

    /// Moves the cursor to `id`. Ignored if there is no such node.
    pub fn to_node(&mut self, id: NodeId) {
        if id.0 < self.nodes.len() {
            self.current = id;
        }
    }

    /// Follows the main continuation, if any.
    pub fn forward(&mut self) {
        if let Some(&child) = self.node(self.current).children.first() {
            self.current = child;
        }
    }

    pub fn back(&mut self) {
        if let Some(parent) = self.node(self.current).parent {
            self.current = parent;
        }
    }

    pub fn to_beginning(&mut self) {
        self.current = NodeId::ROOT;
    }

    /// Follows main continuations from the cursor until the end of the line.
    pub fn to_end(&mut self) {
        while !self.is_at_end() {
            self.forward();
        }
    }

    /// Moves the cursor to the node the current variation branches from,
    /// or to the root if the cursor is on the main line.
    pub fn to_beginning_of_variation(&mut self) {
        let mut id = self.current;
        while let Some(parent) = self.node(id).parent {
            if self.node(parent).children.first() != Some(&id) {
                self.current = parent;
                return;
            }
            id = parent;
        }
        self.current = NodeId::ROOT;
    }

    pub fn is_at_beginning(&self) -> bool {
        self.current == NodeId::ROOT
    }

    /// Whether the cursor has no continuation.
    pub fn is_at_end(&self) -> bool {
        self.node(self.current).is_leaf()
    }

    /// Renders the game as PGN.
    pub fn to_pgn(&self) -> String {
        self.to_string()
    }
}

fn append_comment(slot: &mut Option<String>, comment: String) {
    match slot {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(&comment);
        }
        None => *slot = Some(comment),
    }
}

impl GameBuilder for AnnotatedGame {
    const ANNOTATIONS: bool = true;

    type Cursor = NodeId;

    fn from_headers(headers: Headers, start: Chess) -> AnnotatedGame {
        AnnotatedGame::new(headers, start)
    }

    fn headers_mut(&mut self) -> &mut Headers {
        AnnotatedGame::headers_mut(self)
    }

    fn board(&self) -> &Chess {
        AnnotatedGame::board(self)
    }

    fn cursor(&self) -> NodeId {
        self.current
    }

    fn set_cursor(&mut self, id: NodeId) {
        self.to_node(id);
    }

    fn add_move(&mut self, m: Move) {
        AnnotatedGame::add_move(self, m);
    }

    fn is_at_beginning(&self) -> bool {
        AnnotatedGame::is_at_beginning(self)
    }

    fn is_at_end(&self) -> bool {
        AnnotatedGame::is_at_end(self)
    }

    fn forward(&mut self) {
        AnnotatedGame::forward(self);
    }

    fn back(&mut self) {
        AnnotatedGame::back(self);
    }

    fn to_beginning(&mut self) {
        AnnotatedGame::to_beginning(self);
    }

    fn to_end(&mut self) {
        AnnotatedGame::to_end(self);
    }

    fn to_beginning_of_variation(&mut self) {
        AnnotatedGame::to_beginning_of_variation(self);
    }

    fn add_pre_comment(&mut self, comment: String) {
        AnnotatedGame::add_pre_comment(self, comment);
    }

    fn add_comment(&mut self, comment: String) {
        AnnotatedGame::add_comment(self, comment);
    }
}

impl fmt::Display for AnnotatedGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writer::write_annotated_game(f, self)
    }
}

/// Iterator over the main line of an [`AnnotatedGame`].
#[derive(Debug, Clone)]
pub struct Mainline<'a> {
    game: &'a AnnotatedGame,
    next: Option<NodeId>,
}

impl Iterator for Mainline<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.game.node(id).children.first().copied();
        Some(id)
    }
}

impl FusedIterator for Mainline<'_> {}

#[cfg(feature = "serde")]
mod serialize {
    use serde::ser::{Serialize, SerializeStruct, Serializer};

    use super::{AnnotatedGame, NodeId};

    struct Subtree<'a> {
        game: &'a AnnotatedGame,
        id: NodeId,
    }

    struct Children<'a> {
        game: &'a AnnotatedGame,
        ids: &'a [NodeId],
    }

    impl Serialize for Subtree<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let node = self.game.node(self.id);
            let mut state = serializer.serialize_struct("Node", 4)?;
            state.serialize_field("move", &self.game.san(self.id).map(|san| san.to_string()))?;
            state.serialize_field("precomment", &node.precomment)?;
            state.serialize_field("comment", &node.comment)?;
            state.serialize_field(
                "children",
                &Children {
                    game: self.game,
                    ids: &node.children,
                },
            )?;
            state.end()
        }
    }

    impl Serialize for Children<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.ids.iter().map(|&id| Subtree {
                game: self.game,
                id,
            }))
        }
    }

    impl Serialize for AnnotatedGame {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut state = serializer.serialize_struct("AnnotatedGame", 2)?;
            state.serialize_field("headers", &self.headers)?;
            state.serialize_field(
                "moves",
                &Children {
                    game: self,
                    ids: &self.nodes[0].children,
                },
            )?;
            state.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use shakmaty::san::San;

    use super::*;

    fn play(game: &mut AnnotatedGame, san: &str) -> NodeId {
        let m = san
            .parse::<San>()
            .expect("valid san")
            .to_move(game.board())
            .expect("legal move");
        game.add_move(m)
    }

    fn san(game: &AnnotatedGame, id: NodeId) -> String {
        game.san(id).expect("not the root").to_string()
    }

    #[test]
    fn test_variation_and_return() {
        // 1. e4 (1. d4 d5) e5
        let mut game = AnnotatedGame::default();
        let e4 = play(&mut game, "e4");
        game.back();
        let d4 = play(&mut game, "d4");
        let d5 = play(&mut game, "d5");

        game.to_beginning_of_variation();
        assert!(game.is_at_beginning());
        game.forward();
        assert_eq!(game.current(), e4);
        let e5 = play(&mut game, "e5");

        let root = game.node(game.root());
        assert_eq!(root.children(), [e4, d4]);
        assert_eq!(root.variations(), [d4]);
        assert_eq!(game.node(d4).children(), [d5]);
        assert_eq!(game.node(e4).children(), [e5]);
        assert_eq!(game.node(e5).parent(), Some(e4));
        assert_eq!(game.num_moves(), 4);
    }

    #[test]
    fn test_nested_variation() {
        // 1. e4 e5 (1... c5 2. Nf3 (2. c3) 2... d6) 2. Nf3
        let mut game = AnnotatedGame::default();
        let e4 = play(&mut game, "e4");
        let e5 = play(&mut game, "e5");
        game.back();
        let c5 = play(&mut game, "c5");
        let nf3 = play(&mut game, "Nf3");
        game.back();
        play(&mut game, "c3");

        game.to_beginning_of_variation();
        assert_eq!(game.current(), c5);
        game.forward();
        assert_eq!(game.current(), nf3);
        play(&mut game, "d6");

        game.to_beginning_of_variation();
        assert_eq!(game.current(), e4);
        game.forward();
        assert_eq!(game.current(), e5);
    }

    #[test]
    fn test_mainline_and_navigation() {
        let mut game = AnnotatedGame::default();
        for san in ["e4", "e5", "Nf3"] {
            play(&mut game, san);
        }
        game.to_beginning();
        play(&mut game, "d4");

        let mainline: Vec<_> = game.mainline().map(|id| san(&game, id)).collect();
        assert_eq!(mainline, ["e4", "e5", "Nf3"]);

        game.to_beginning();
        game.back();
        assert!(game.is_at_beginning());
        game.to_end();
        assert!(game.is_at_end());
        assert_eq!(san(&game, game.current()), "Nf3");
        assert_eq!(game.san(game.root()), None);
    }

    #[test]
    fn test_comments_are_joined() {
        let mut game = AnnotatedGame::default();
        play(&mut game, "e4");
        game.add_pre_comment("first".to_owned());
        game.add_comment("good".to_owned());
        game.add_comment("move".to_owned());

        let node = game.node(game.current());
        assert_eq!(node.precomment(), Some("first"));
        assert_eq!(node.comment(), Some("good move"));
    }

    #[test]
    fn test_check_suffix() {
        let mut game = AnnotatedGame::default();
        for san in ["e4", "f5", "Qh5"] {
            play(&mut game, san);
        }
        assert_eq!(san(&game, game.current()), "Qh5+");
    }
}
