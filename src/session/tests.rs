use super::*;
use crate::config::{Action, Config};
use crate::draw::{
    BLACK, BLUE, BackgroundStyle, DrawingAttributes, RED, Stroke, StrokeCollection, TipShape,
    YELLOW, generate,
};
use crate::input::{EraserMode, Key, Modifiers, Tool, ToolTransition};
use crate::surface::{EditingMode, InkSurface, MemorySurface, SurfaceEvent};
use kurbo::Point;

type TestSession = InkSession<MemorySurface, RecordingNotifier>;

fn line(y: f64) -> Vec<Point> {
    (0..=10).map(|i| Point::new(i as f64 * 10.0, y)).collect()
}

fn attached() -> TestSession {
    let mut session = InkSession::new(RecordingNotifier::default());
    session.attach_surface(MemorySurface::new());
    session
}

fn draw(session: &mut TestSession, y: f64) {
    let event = session.surface_mut().and_then(|surface| surface.trace(&line(y)));
    if let Some(event) = event {
        session.handle_surface_event(event);
    }
}

/// Stroke identities on the surface, by the y coordinate they were drawn at.
fn rows(session: &TestSession) -> Vec<f64> {
    session
        .surface()
        .map(|surface| surface.strokes().iter().map(|s| s.points[0].y).collect())
        .unwrap_or_default()
}

#[test]
fn draw_undo_redo_scenario() {
    let mut session = attached();
    draw(&mut session, 1.0); // A
    draw(&mut session, 2.0); // B
    assert_eq!(rows(&session), vec![1.0, 2.0]);
    assert_eq!(session.history().undo_depth(), 3);

    session.undo();
    assert_eq!(rows(&session), vec![1.0]);
    session.undo();
    assert!(rows(&session).is_empty());
    session.redo();
    assert_eq!(rows(&session), vec![1.0]);

    draw(&mut session, 3.0); // C
    assert_eq!(rows(&session), vec![1.0, 3.0]);
    assert_eq!(session.history().redo_depth(), 0);

    session.redo();
    assert_eq!(rows(&session), vec![1.0, 3.0]);
}

#[test]
fn undo_past_initial_state_is_silent() {
    let mut session = attached();
    session.undo();
    session.undo();
    session.redo();
    assert!(rows(&session).is_empty());
    assert_eq!(session.history().undo_depth(), 1);
    assert!(session.notifier().messages.is_empty());
}

/// Surface that reports a change for every replacement, as hosts that fire
/// collection-changed callbacks do.
#[derive(Default)]
struct NoisySurface {
    inner: MemorySurface,
}

impl InkSurface for NoisySurface {
    fn strokes(&self) -> &StrokeCollection {
        self.inner.strokes()
    }

    fn replace_strokes(&mut self, strokes: StrokeCollection) -> Vec<SurfaceEvent> {
        self.inner.replace_strokes(strokes);
        vec![SurfaceEvent::StrokeErased, SurfaceEvent::StrokeCollected]
    }

    fn set_editing_mode(&mut self, mode: EditingMode) {
        self.inner.set_editing_mode(mode);
    }

    fn set_drawing_attributes(&mut self, attributes: DrawingAttributes) {
        self.inner.set_drawing_attributes(attributes);
    }

    fn clear_selection(&mut self) {
        self.inner.clear_selection();
    }

    fn set_background(&mut self, tile: crate::draw::TileDescriptor) {
        self.inner.set_background(tile);
    }
}

#[test]
fn replayed_states_do_not_enter_history() {
    let mut session: InkSession<NoisySurface, RecordingNotifier> =
        InkSession::new(RecordingNotifier::default());
    session.attach_surface(NoisySurface::default());

    for y in [1.0, 2.0] {
        let event = session
            .surface_mut()
            .and_then(|surface| surface.inner.trace(&line(y)));
        session.handle_surface_event(event.expect("stroke committed"));
    }
    assert_eq!(session.history().undo_depth(), 3);

    session.undo();
    assert_eq!(session.history().undo_depth(), 2);
    assert_eq!(session.history().redo_depth(), 1);

    session.redo();
    assert_eq!(session.history().undo_depth(), 3);
    assert_eq!(session.history().redo_depth(), 0);
    assert!(!session.history().is_suppressed());

    session.clear_canvas();
    assert_eq!(session.history().undo_depth(), 4);
    assert!(session.surface().is_some_and(|s| s.strokes().is_empty()));
}

#[test]
fn erasing_is_undoable() {
    let mut session = attached();
    draw(&mut session, 0.0);
    session.set_eraser_mode(EraserMode::ByStroke);
    session.select_tool(Tool::Eraser);

    let event = session
        .surface_mut()
        .and_then(|surface| surface.trace(&[Point::new(50.0, 0.0)]));
    assert_eq!(event, Some(SurfaceEvent::StrokeErased));
    session.handle_surface_event(SurfaceEvent::StrokeErased);
    assert!(rows(&session).is_empty());

    session.undo();
    assert_eq!(rows(&session), vec![0.0]);
}

#[test]
fn clear_canvas_is_one_undoable_step() {
    let mut session = attached();
    draw(&mut session, 1.0);
    draw(&mut session, 2.0);

    session.clear_canvas();
    assert!(rows(&session).is_empty());
    assert_eq!(session.history().redo_depth(), 0);

    session.undo();
    assert_eq!(rows(&session), vec![1.0, 2.0]);
}

#[test]
fn save_then_load_restores_strokes_as_new_step() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("ink.json");

    let mut session = attached();
    draw(&mut session, 1.0);
    draw(&mut session, 2.0);
    session.save(&path).unwrap();
    assert_eq!(session.notifier().last(), Some("Save Successful!"));

    session.clear_canvas();
    session.undo();
    session.undo();
    assert_eq!(session.history().redo_depth(), 2);

    session.load(&path).unwrap();
    assert_eq!(rows(&session), vec![1.0, 2.0]);
    assert_eq!(session.history().redo_depth(), 0);

    session.undo();
    assert_eq!(rows(&session), vec![1.0]);
}

#[test]
fn failed_load_changes_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("broken.json");
    std::fs::write(&path, b"{ not strokes").unwrap();

    let mut session = attached();
    draw(&mut session, 1.0);
    let depth = session.history().undo_depth();

    assert!(session.load(&path).is_err());
    assert!(session.load(&temp.path().join("missing.json")).is_err());

    assert_eq!(rows(&session), vec![1.0]);
    assert_eq!(session.history().undo_depth(), depth);
    let messages = &session.notifier().messages;
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m.starts_with("Load Failed: ")));
}

#[test]
fn failed_save_notifies() {
    let temp = tempfile::tempdir().unwrap();
    let mut session = attached();
    draw(&mut session, 1.0);

    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();

    assert!(session.save(&blocker.join("ink.json")).is_err());
    assert!(
        session
            .notifier()
            .last()
            .is_some_and(|m| m.starts_with("Save Failed: "))
    );
    assert_eq!(rows(&session), vec![1.0]);
}

#[test]
fn save_refuses_strokes_that_cannot_be_reloaded() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("ink.json");
    let broken: StrokeCollection = vec![Stroke::new(
        vec![Point::new(f64::NAN, 1.0), Point::new(5.0, 5.0)],
        DrawingAttributes::pen(RED, 2.0),
    )]
    .into_iter()
    .collect();

    let mut session: TestSession = InkSession::new(RecordingNotifier::default());
    session.attach_surface(MemorySurface::with_strokes(broken));

    assert!(matches!(
        session.save(&path),
        Err(PersistError::NonFinite(0))
    ));
    assert!(!path.exists());
    assert!(
        session
            .notifier()
            .last()
            .is_some_and(|m| m.starts_with("Save Failed: "))
    );
}

#[test]
fn commands_before_attach_do_not_touch_history_or_files() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("ink.json");
    let mut session: TestSession = InkSession::new(RecordingNotifier::default());

    session.undo();
    session.redo();
    session.clear_canvas();
    session.handle_surface_event(SurfaceEvent::StrokeCollected);
    assert!(session.save(&path).is_ok());
    assert!(session.load(&path).is_ok());
    assert!(!path.exists());
    assert_eq!(session.history().undo_depth(), 1);
    assert!(session.notifier().messages.is_empty());
    assert!(session.surface().is_none());
}

#[test]
fn settings_made_before_attach_apply_on_attach() {
    let mut session: TestSession = InkSession::new(RecordingNotifier::default());
    session.set_color(BLUE);
    session.set_background_style(BackgroundStyle::Rule);
    session.select_tool(Tool::Highlighter);

    session.attach_surface(MemorySurface::new());
    let surface = session.surface().expect("attached");
    assert_eq!(surface.editing_mode(), EditingMode::Ink);
    assert!(surface.attributes().is_highlighter);
    assert_eq!(surface.attributes().color, BLUE);
    assert_eq!(surface.background(), &generate(BackgroundStyle::Rule));
}

#[test]
fn attach_seeds_history_with_existing_ink() {
    let existing: StrokeCollection = vec![Stroke::new(line(7.0), DrawingAttributes::pen(RED, 2.0))]
        .into_iter()
        .collect();
    let mut session: TestSession = InkSession::new(RecordingNotifier::default());
    session.attach_surface(MemorySurface::with_strokes(existing));

    session.undo();
    assert_eq!(rows(&session), vec![7.0]);
    assert!(!session.history().can_undo());
}

#[test]
fn reselecting_tool_opens_options_only() {
    let mut session = attached();
    session.select_tool(Tool::Eraser);
    session.set_eraser_mode(EraserMode::ByStroke);
    assert_eq!(
        session.surface().map(|s| s.editing_mode()),
        Some(EditingMode::EraseByStroke)
    );

    let transition = session.select_tool(Tool::Eraser);
    assert_eq!(transition, ToolTransition::OpenOptions(Tool::Eraser));
    assert_eq!(session.tool_state().active_tool, Tool::Eraser);
    assert_eq!(
        session.surface().map(|s| s.editing_mode()),
        Some(EditingMode::EraseByStroke)
    );
}

#[test]
fn eraser_size_applies_only_in_point_mode() {
    let mut session = attached();
    session.select_tool(Tool::Eraser);
    session.set_eraser_mode(EraserMode::ByStroke);
    session.set_eraser_size(30.0);
    assert_eq!(
        session.surface().map(|s| s.editing_mode()),
        Some(EditingMode::EraseByStroke)
    );

    session.set_eraser_mode(EraserMode::ByPoint);
    assert_eq!(
        session.surface().map(|s| s.editing_mode()),
        Some(EditingMode::EraseByPoint { size: 30.0 })
    );

    session.set_eraser_size(12.0);
    assert_eq!(
        session.surface().map(|s| s.editing_mode()),
        Some(EditingMode::EraseByPoint { size: 12.0 })
    );
}

#[test]
fn highlighter_substitutes_black_without_forgetting_it() {
    let mut session = attached();
    session.set_color(BLACK);
    session.select_tool(Tool::Highlighter);

    let attributes = *session.surface().expect("attached").attributes();
    assert_eq!(attributes.color, YELLOW);
    assert_eq!(attributes.tip, TipShape::Rectangle);
    assert_eq!((attributes.width, attributes.height), (20.0, 20.0));
    assert_eq!(session.tool_state().current_color, BLACK);

    session.select_tool(Tool::Pen);
    assert_eq!(session.surface().expect("attached").attributes().color, BLACK);
}

#[test]
fn calligraphy_and_size_reapply_to_active_pen() {
    let mut session = attached();
    session.set_size(9.0);
    session.set_calligraphy(true);
    let attributes = *session.surface().expect("attached").attributes();
    assert_eq!(attributes.width, 9.0);
    assert!(attributes.tip_transform.is_some());

    session.select_tool(Tool::Select);
    session.set_calligraphy(false);
    assert_eq!(
        session.surface().map(|s| s.editing_mode()),
        Some(EditingMode::Select)
    );
    assert!(session.surface().expect("attached").attributes().tip_transform.is_some());
}

#[test]
fn background_changes_reach_surface() {
    let mut session = attached();
    session.set_background_style(BackgroundStyle::Grid);
    assert_eq!(session.background_style(), BackgroundStyle::Grid);
    assert_eq!(
        session.surface().map(|s| s.background().clone()),
        Some(generate(BackgroundStyle::Grid))
    );
}

#[test]
fn ctrl_z_and_ctrl_y_drive_history() {
    let mut session = attached();
    draw(&mut session, 1.0);

    assert_eq!(
        session.on_key_press(Key::Char('z'), Modifiers::ctrl()),
        Some(Action::Undo)
    );
    assert!(rows(&session).is_empty());

    assert_eq!(
        session.on_key_press(Key::Char('y'), Modifiers::ctrl()),
        Some(Action::Redo)
    );
    assert_eq!(rows(&session), vec![1.0]);

    let ctrl_shift = Modifiers {
        shift: true,
        ..Modifiers::ctrl()
    };
    assert_eq!(session.on_key_press(Key::Char('z'), ctrl_shift), None);
    assert_eq!(session.on_key_press(Key::Char('z'), Modifiers::new()), None);
    assert_eq!(session.on_key_press(Key::Ctrl, Modifiers::ctrl()), None);
    assert_eq!(rows(&session), vec![1.0]);
}

#[test]
fn config_keybindings_and_tools_are_used() {
    let config: Config = toml::from_str(
        r#"
[drawing]
default_color = "red"

[background]
style = "rule"

[keybindings]
clear_canvas = ["Ctrl+Delete"]
"#,
    )
    .unwrap();

    let mut session = InkSession::from_config(&config, RecordingNotifier::default());
    session.attach_surface(MemorySurface::new());
    assert_eq!(session.surface().expect("attached").attributes().color, RED);
    assert_eq!(session.background_style(), BackgroundStyle::Rule);

    draw(&mut session, 1.0);
    assert_eq!(
        session.on_key_press(Key::Delete, Modifiers::ctrl()),
        Some(Action::ClearCanvas)
    );
    assert!(rows(&session).is_empty());
}
