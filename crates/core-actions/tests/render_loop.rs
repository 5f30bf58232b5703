//! Keys dispatched and rendered the way the main loop does it.

mod common;
use common::*;

use core_input::RawKey;
use core_render::Renderer;
use core_state::RenderRequest;
use core_terminal::{MemorySink, TermCommand};

fn frame(s: &mut Session, renderer: &mut Renderer, sink: &mut MemorySink) -> Option<RenderRequest> {
    sink.clear();
    renderer
        .render_pending(&mut s.state, sink)
        .unwrap()
        .map(|d| d.effective)
}

#[test]
fn typing_uses_char_updates() {
    let mut s = Session::with_screen("", 40, 10);
    let mut renderer = Renderer::new();
    let mut sink = MemorySink::new();
    s.state.request(RenderRequest::Full);
    assert_eq!(frame(&mut s, &mut renderer, &mut sink), Some(RenderRequest::Full));
    assert!(sink.text().contains("untitled.txt"));

    s.key(RawKey::byte(b'H'));
    assert_eq!(frame(&mut s, &mut renderer, &mut sink), Some(RenderRequest::CharFrom(0)));
    assert!(sink.text().contains('H'));
    s.key(RawKey::byte(b'i'));
    assert_eq!(frame(&mut s, &mut renderer, &mut sink), Some(RenderRequest::CharFrom(1)));
    assert!(sink.text().contains("L:1/1 C:2"));

    s.key(RawKey::enter());
    assert_eq!(frame(&mut s, &mut renderer, &mut sink), Some(RenderRequest::DownFrom(2)));
    // Nothing pending means nothing drawn.
    assert_eq!(frame(&mut s, &mut renderer, &mut sink), None);
    assert!(sink.commands.is_empty());
}

#[test]
fn typing_past_the_window_scrolls() {
    let mut s = Session::with_screen("", 40, 10);
    let mut renderer = Renderer::new();
    let mut sink = MemorySink::new();
    s.state.request(RenderRequest::Full);
    frame(&mut s, &mut renderer, &mut sink);
    for i in 0..12 {
        s.typed(&format!("line {i}\r"));
        frame(&mut s, &mut renderer, &mut sink);
    }
    assert!(s.state.view.top > 0);
    assert!(s.state.cursor_visible());
    assert!(core_actions::is_visible(&s.state, s.state.cursor.pos));
}

#[test]
fn status_message_lasts_one_frame() {
    let mut s = Session::with_screen("some text", 40, 10);
    let mut renderer = Renderer::new();
    let mut sink = MemorySink::new();
    s.state.request(RenderRequest::Full);
    frame(&mut s, &mut renderer, &mut sink);

    s.key(RawKey::ctrl(b'a'));
    frame(&mut s, &mut renderer, &mut sink);
    assert!(sink.text().contains("All text selected"));
    assert!(sink.text().contains("S:9 "));

    s.key(RawKey::right());
    frame(&mut s, &mut renderer, &mut sink);
    assert!(!sink.text().contains("All text selected"));
}

#[test]
fn selection_extension_repaints_highlight() {
    let mut s = Session::with_screen("abcdef", 40, 10);
    let mut renderer = Renderer::new();
    let mut sink = MemorySink::new();
    s.state.request(RenderRequest::Full);
    frame(&mut s, &mut renderer, &mut sink);

    s.key(RawKey::right().shift());
    s.key(RawKey::right().shift());
    let effective = frame(&mut s, &mut renderer, &mut sink);
    assert_eq!(effective, Some(RenderRequest::MinimalFrom(0)));
    assert!(sink.commands.contains(&TermCommand::ReverseOn));
    assert!(sink.commands.contains(&TermCommand::Text(b"ab".to_vec())));
}

#[test]
fn help_overlay_then_any_key_restores_text() {
    let mut s = Session::with_screen("body", 80, 24);
    let mut renderer = Renderer::new();
    let mut sink = MemorySink::new();
    s.key(RawKey::ctrl(b'h'));
    frame(&mut s, &mut renderer, &mut sink);
    assert!(renderer.engine.help_visible());

    s.key(RawKey::byte(b'q'));
    frame(&mut s, &mut renderer, &mut sink);
    assert!(!renderer.engine.help_visible());
    assert!(sink.text().contains("body"));
}
