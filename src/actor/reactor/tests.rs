use pretty_assertions::assert_eq;
use test_log::test;

use super::*;
use crate::actor::channel;
use crate::bus::ErrorKind;
use crate::common::config::Config;
use crate::sys::geometry::Rect;
use crate::sys::screen::{ScreenDescriptor, VirtualScreens};

const A: Rect = Rect::new(0, 0, 1000, 1000);
const B: Rect = Rect::new(1000, 0, 1000, 1000);

fn reactor() -> (Reactor, VirtualScreens) {
    let screens = VirtualScreens::default();
    let cx = Context::with_config(&Config::default(), screens.clone()).unwrap();
    (Reactor::new(cx), screens)
}

fn open_window(screens: &VirtualScreens, raw: u64, frame: Rect) -> Event {
    let handle = WindowHandle::new(raw);
    screens.set_window_frame(handle, frame);
    Event::WindowCreated { handle, title: format!("window {raw}") }
}

fn devices(reactor: &Reactor) -> Vec<String> {
    let cx = reactor.context();
    cx.lookup()
        .monitors()
        .map(|m| cx.tree().monitor(m).unwrap().device_id().to_owned())
        .collect()
}

#[test]
fn screen_changes_add_update_and_remove_monitors() {
    let (mut reactor, screens) = reactor();
    screens.set_screens(vec![ScreenDescriptor::new("A", A), ScreenDescriptor::new("B", B)]);
    reactor.handle_event(Event::ScreensChanged).unwrap();
    assert_eq!(vec!["A", "B"], devices(&reactor));

    let wide = Rect::new(0, 0, 2000, 1000);
    screens.set_screens(vec![ScreenDescriptor::new("A", wide)]);
    reactor.handle_event(Event::ScreensChanged).unwrap();
    assert_eq!(vec!["A"], devices(&reactor));

    let cx = reactor.context();
    let a = cx.lookup().monitor_by_device("A").unwrap();
    assert_eq!(wide, cx.tree().monitor(a).unwrap().screen.frame);
    // B's workspace moved over to A.
    assert_eq!(Some(a), cx.tree().parent(cx.lookup().find_workspace("2").unwrap()));
    cx.tree().assert_consistent();
}

#[test]
fn unchanged_screens_are_a_no_op() {
    let (mut reactor, screens) = reactor();
    screens.set_screens(vec![ScreenDescriptor::new("A", A)]);
    reactor.handle_event(Event::ScreensChanged).unwrap();
    let before = reactor.context().tree().len();
    reactor.handle_event(Event::ScreensChanged).unwrap();
    assert_eq!(before, reactor.context().tree().len());
}

#[test]
fn window_lifecycle() {
    let (mut reactor, screens) = reactor();
    screens.set_screens(vec![ScreenDescriptor::new("A", A), ScreenDescriptor::new("B", B)]);
    reactor.handle_event(Event::ScreensChanged).unwrap();

    reactor.handle_event(open_window(&screens, 1, Rect::new(1200, 0, 300, 300))).unwrap();
    reactor.handle_event(open_window(&screens, 2, Rect::new(0, 0, 300, 300))).unwrap();
    let cx = reactor.context();
    let first = cx.lookup().find_window(WindowHandle::new(1)).unwrap();
    let second = cx.lookup().find_window(WindowHandle::new(2)).unwrap();
    assert_eq!(Some(cx.lookup().find_workspace("2").unwrap()), cx.tree().parent(first));
    assert_eq!(Some(second), cx.focus().focused_window);

    reactor.handle_event(Event::WindowFocused(WindowHandle::new(1))).unwrap();
    assert_eq!(Some(first), reactor.context().focus().focused_window);

    reactor.handle_event(Event::WindowDestroyed(WindowHandle::new(1))).unwrap();
    assert_eq!(None, reactor.context().lookup().find_window(WindowHandle::new(1)));
}

#[test]
fn rejections_are_reported() {
    let (mut reactor, screens) = reactor();
    assert_eq!(
        Err(ReactorError::Rejected {
            command: "add_window",
            kind: ErrorKind::ExternalResolutionFailure,
        }),
        reactor.handle_event(open_window(&screens, 1, A))
    );
    assert_eq!(
        Err(ReactorError::UnknownWindow(WindowHandle::new(9))),
        reactor.handle_event(Event::WindowDestroyed(WindowHandle::new(9)))
    );

    screens.set_screens(vec![ScreenDescriptor::new("A", A)]);
    reactor.handle_event(Event::ScreensChanged).unwrap();
    reactor.handle_event(open_window(&screens, 1, A)).unwrap();
    assert_eq!(
        Err(ReactorError::Rejected { command: "add_window", kind: ErrorKind::AlreadyExists }),
        reactor.handle_event(open_window(&screens, 1, A))
    );
}

#[test]
fn run_stops_at_shutdown() {
    let (reactor, screens) = reactor();
    screens.set_screens(vec![ScreenDescriptor::new("A", A)]);
    let (tx, rx) = channel();
    tx.send(Event::ScreensChanged);
    tx.send(open_window(&screens, 1, A));
    // Errors do not stop the loop.
    tx.send(Event::WindowFocused(WindowHandle::new(42)));
    tx.send(Event::Shutdown);
    tx.send(open_window(&screens, 2, A));

    let cx = reactor.run(rx);
    assert!(cx.lookup().find_window(WindowHandle::new(1)).is_some());
    assert!(cx.lookup().find_window(WindowHandle::new(2)).is_none());
}

#[test]
fn run_stops_when_senders_are_gone() {
    let (reactor, screens) = reactor();
    screens.set_screens(vec![ScreenDescriptor::new("A", A)]);
    let (tx, rx) = channel();
    tx.send(Event::ScreensChanged);
    drop(tx);
    let cx = reactor.run(rx);
    assert_eq!(1, cx.lookup().monitors().count());
}
