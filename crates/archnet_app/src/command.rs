// SPDX-License-Identifier: MIT OR Apache-2.0
//! User-facing canvas commands.
//!
//! Each command performs one read→compute→write cycle against a canvas
//! document. All validation happens before anything is mutated, and an
//! engine failure aborts the cycle before any write, so a failed completion
//! never leaves half-persisted cards behind.

use crate::settings::{EngineSettings, Settings};
use archnet_canvas::{
    ancestry, layout, CanvasError, CanvasStore, DocumentLocks, Edge, Node, NodeId, Point,
};
use archnet_engine::{CompletionEngine, EngineError, HttpEngine, LocalEngine};
use std::path::{Path, PathBuf};

/// File extension accepted by canvas commands.
const CANVAS_EXTENSION: &str = "canvas";

/// Errors surfaced by the command layer.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The target file is not a canvas document.
    #[error("{0:?} is not a canvas file")]
    NotACanvas(PathBuf),

    /// No card was selected.
    #[error("no card selected")]
    NoSelection,

    /// More than one card was selected where exactly one is required.
    #[error("{0} cards selected where exactly one is required")]
    AmbiguousSelection(usize),

    /// The selected card does not exist in the document.
    #[error("selected card {0} not found in the document")]
    SelectionNotFound(String),

    /// Document read/parse/write failure.
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// Completion engine failure.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Shared collaborators for command execution.
pub struct CommandContext<'a> {
    /// Document store.
    pub store: &'a dyn CanvasStore,
    /// Per-document locks.
    pub locks: &'a DocumentLocks,
}

/// Outcome of a successful expansion.
#[derive(Debug)]
pub struct ExpandOutcome {
    /// Ids of the cards added to the document.
    pub created: Vec<NodeId>,
    /// The prompt that was sent to the engine.
    pub prompt: String,
}

/// Build the engine binding named by the settings.
pub fn engine_from_settings(
    settings: &EngineSettings,
) -> Result<Box<dyn CompletionEngine>, CommandError> {
    Ok(match settings {
        EngineSettings::Http(config) => Box::new(HttpEngine::new(config.clone())?),
        EngineSettings::Local(config) => Box::new(LocalEngine::new(config.clone())),
    })
}

fn require_canvas(path: &Path) -> Result<(), CommandError> {
    match path.extension() {
        Some(ext) if ext == CANVAS_EXTENSION => Ok(()),
        _ => Err(CommandError::NotACanvas(path.to_path_buf())),
    }
}

fn require_single_selection(selection: &[String]) -> Result<&str, CommandError> {
    match selection {
        [] => Err(CommandError::NoSelection),
        [id] => Ok(id),
        more => Err(CommandError::AmbiguousSelection(more.len())),
    }
}

/// Expand the selected card: collect its ancestor prompt, ask the engine for
/// completions and append them as child cards laid out below it.
pub async fn expand(
    ctx: &CommandContext<'_>,
    engine: &dyn CompletionEngine,
    settings: &Settings,
    canvas_path: &Path,
    selection: &[String],
    count: Option<usize>,
) -> Result<ExpandOutcome, CommandError> {
    require_canvas(canvas_path)?;
    let selected = NodeId::from(require_single_selection(selection)?);
    let count = count.unwrap_or(settings.completions).max(1);

    let lock = ctx.locks.for_path(canvas_path);
    let _guard = lock.lock().await;

    let mut canvas = ctx.store.read(canvas_path)?;
    let node = canvas
        .node(&selected)
        .ok_or_else(|| CommandError::SelectionNotFound(selected.to_string()))?;

    let prompt = ancestry::node_prompt(&canvas, node);
    let anchor = Point {
        x: node.x,
        y: node.y,
    };

    tracing::info!(
        "expanding card {} with {} completion(s) via {} engine",
        selected,
        count,
        engine.name()
    );
    let completions = engine.complete(&prompt, count).await?;

    let positions = layout::child_positions(anchor, completions.len(), &settings.layout);
    let mut nodes = Vec::with_capacity(completions.len());
    let mut edges = Vec::with_capacity(completions.len());
    for (position, text) in positions.into_iter().zip(completions) {
        let child = Node::text(
            position.x,
            position.y,
            settings.layout.child_width,
            settings.layout.child_height,
            text,
        );
        edges.push(Edge::connect(selected.clone(), child.id.clone()));
        nodes.push(child);
    }

    let created: Vec<NodeId> = nodes.iter().map(|n| n.id.clone()).collect();
    canvas.append(nodes, edges);
    ctx.store.write(canvas_path, &canvas)?;

    Ok(ExpandOutcome { created, prompt })
}

/// Assemble and return the prompt for the selected card without invoking an
/// engine.
pub async fn prompt(
    ctx: &CommandContext<'_>,
    canvas_path: &Path,
    selection: &[String],
) -> Result<String, CommandError> {
    require_canvas(canvas_path)?;
    let selected = NodeId::from(require_single_selection(selection)?);

    let lock = ctx.locks.for_path(canvas_path);
    let _guard = lock.lock().await;

    let canvas = ctx.store.read(canvas_path)?;
    let node = canvas
        .node(&selected)
        .ok_or_else(|| CommandError::SelectionNotFound(selected.to_string()))?;
    Ok(ancestry::node_prompt(&canvas, node))
}

/// Place file cards on the canvas in a grid at the configured anchor.
pub async fn add_files(
    ctx: &CommandContext<'_>,
    settings: &Settings,
    canvas_path: &Path,
    files: &[String],
) -> Result<Vec<NodeId>, CommandError> {
    require_canvas(canvas_path)?;
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let lock = ctx.locks.for_path(canvas_path);
    let _guard = lock.lock().await;

    let mut canvas = ctx.store.read(canvas_path)?;
    let grid = &settings.grid;
    let positions = layout::grid_positions(
        Point {
            x: grid.x,
            y: grid.y,
        },
        files.len(),
        grid.columns,
        grid.width,
        grid.height,
        grid.margin,
    );

    let nodes: Vec<Node> = positions
        .into_iter()
        .zip(files)
        .map(|(position, file)| {
            Node::file(position.x, position.y, grid.width, grid.height, file.clone())
        })
        .collect();
    let created: Vec<NodeId> = nodes.iter().map(|n| n.id.clone()).collect();

    canvas.append(nodes, []);
    ctx.store.write(canvas_path, &canvas)?;

    tracing::info!(
        "placed {} file card(s) on {:?}",
        created.len(),
        canvas_path
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use archnet_canvas::{Canvas, FsCanvasStore, NodeContent, Side};
    use archnet_engine::EngineResult;
    use async_trait::async_trait;
    use std::collections::HashSet;

    struct FixedEngine(Vec<String>);

    #[async_trait]
    impl CompletionEngine for FixedEngine {
        async fn complete(&self, _prompt: &str, _n: usize) -> EngineResult<Vec<String>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingEngine;

    #[async_trait]
    impl CompletionEngine for FailingEngine {
        async fn complete(&self, _prompt: &str, _n: usize) -> EngineResult<Vec<String>> {
            Err(EngineError::Empty)
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn seed_chain(store: &FsCanvasStore, path: &Path) {
        let mut canvas = Canvas::default();
        let mut root = Node::text(0, 0, 400, 250, "the root idea");
        root.id = NodeId::from("root");
        let mut leaf = Node::text(0, 500, 400, 250, "a refinement");
        leaf.id = NodeId::from("leaf");
        let edge = Edge::connect(NodeId::from("root"), NodeId::from("leaf"));
        canvas.append([root, leaf], [edge]);
        store.write(path, &canvas).unwrap();
    }

    fn test_context<'a>(
        store: &'a FsCanvasStore,
        locks: &'a DocumentLocks,
    ) -> CommandContext<'a> {
        CommandContext { store, locks }
    }

    #[tokio::test]
    async fn test_expand_appends_completions_below_the_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.canvas");
        let store = FsCanvasStore::new();
        let locks = DocumentLocks::new();
        seed_chain(&store, &path);

        let engine = FixedEngine(vec!["left branch".to_owned(), "right branch".to_owned()]);
        let settings = Settings::default();
        let outcome = expand(
            &test_context(&store, &locks),
            &engine,
            &settings,
            &path,
            &["leaf".to_owned()],
            None,
        )
        .await
        .unwrap();

        assert_eq!(outcome.prompt, "the root idea a refinement");
        assert_eq!(outcome.created.len(), 2);

        let canvas = store.read(&path).unwrap();
        assert_eq!(canvas.node_count(), 4);
        assert_eq!(canvas.edge_count(), 3);

        // Even count: offsets [-500, 500], subtracted from the anchor's x.
        for (id, expected_x) in outcome.created.iter().zip([500, -500]) {
            let node = canvas.node(id).unwrap();
            assert_eq!(node.x, expected_x);
            assert_eq!(node.y, 500 + 500);
            assert_eq!(node.width, 400);
            assert_eq!(node.height, 250);
            let edge = canvas.parent_edge(id).unwrap();
            assert_eq!(edge.from_node, NodeId::from("leaf"));
            assert_eq!(edge.from_side, Side::Bottom);
            assert_eq!(edge.to_side, Side::Top);
        }
    }

    #[tokio::test]
    async fn test_expand_rejects_non_canvas_files() {
        let store = FsCanvasStore::new();
        let locks = DocumentLocks::new();
        let engine = FixedEngine(vec!["text".to_owned()]);
        let settings = Settings::default();

        let err = expand(
            &test_context(&store, &locks),
            &engine,
            &settings,
            Path::new("notes.md"),
            &["a".to_owned()],
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::NotACanvas(_)));
    }

    #[tokio::test]
    async fn test_expand_requires_exactly_one_selection() {
        let store = FsCanvasStore::new();
        let locks = DocumentLocks::new();
        let engine = FixedEngine(vec!["text".to_owned()]);
        let settings = Settings::default();
        let ctx = test_context(&store, &locks);

        let err = expand(&ctx, &engine, &settings, Path::new("doc.canvas"), &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::NoSelection));

        let err = expand(
            &ctx,
            &engine,
            &settings,
            Path::new("doc.canvas"),
            &["a".to_owned(), "b".to_owned()],
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::AmbiguousSelection(2)));
    }

    #[tokio::test]
    async fn test_failed_engine_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.canvas");
        let store = FsCanvasStore::new();
        let locks = DocumentLocks::new();
        seed_chain(&store, &path);
        let before = std::fs::read_to_string(&path).unwrap();

        let settings = Settings::default();
        let err = expand(
            &test_context(&store, &locks),
            &FailingEngine,
            &settings,
            &path,
            &["leaf".to_owned()],
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::Engine(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_repeated_expansion_grows_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.canvas");
        let store = FsCanvasStore::new();
        let locks = DocumentLocks::new();
        seed_chain(&store, &path);

        let engine = FixedEngine(vec!["another branch".to_owned()]);
        let settings = Settings::default();
        let ctx = test_context(&store, &locks);

        let first = expand(&ctx, &engine, &settings, &path, &["leaf".to_owned()], None)
            .await
            .unwrap();
        let second = expand(&ctx, &engine, &settings, &path, &["leaf".to_owned()], None)
            .await
            .unwrap();

        // Generative, not idempotent: each invocation adds distinct cards.
        assert_ne!(first.created, second.created);

        let canvas = store.read(&path).unwrap();
        assert_eq!(canvas.node_count(), 4);
        let ids: HashSet<&NodeId> = canvas.nodes.iter().map(|n| &n.id).collect();
        assert_eq!(ids.len(), canvas.node_count());
    }

    #[tokio::test]
    async fn test_expand_unknown_selection_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.canvas");
        let store = FsCanvasStore::new();
        let locks = DocumentLocks::new();
        seed_chain(&store, &path);

        let engine = FixedEngine(vec!["text".to_owned()]);
        let settings = Settings::default();
        let err = expand(
            &test_context(&store, &locks),
            &engine,
            &settings,
            &path,
            &["ghost".to_owned()],
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::SelectionNotFound(_)));
    }

    #[tokio::test]
    async fn test_prompt_reads_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.canvas");
        let store = FsCanvasStore::new();
        let locks = DocumentLocks::new();
        seed_chain(&store, &path);
        let before = std::fs::read_to_string(&path).unwrap();

        let text = prompt(&test_context(&store, &locks), &path, &["leaf".to_owned()])
            .await
            .unwrap();
        assert_eq!(text, "the root idea a refinement");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_add_files_places_a_grid_on_an_empty_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.canvas");
        let store = FsCanvasStore::new();
        let locks = DocumentLocks::new();

        let settings = Settings::default();
        let files = vec!["a.md".to_owned(), "b.md".to_owned(), "c.md".to_owned()];
        let created = add_files(&test_context(&store, &locks), &settings, &path, &files)
            .await
            .unwrap();
        assert_eq!(created.len(), 3);

        let canvas = store.read(&path).unwrap();
        assert_eq!(canvas.node_count(), 3);
        let first = canvas.node(&created[0]).unwrap();
        assert_eq!((first.x, first.y), (0, 0));
        assert_eq!(
            first.content,
            NodeContent::File {
                file: "a.md".to_owned()
            }
        );
        let second = canvas.node(&created[1]).unwrap();
        assert_eq!((second.x, second.y), (450, 0));
    }
}
