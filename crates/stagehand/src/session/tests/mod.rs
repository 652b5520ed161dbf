//! Session scenarios, driven the way a command stream would drive them

mod assets;
mod camera;
mod composition;
mod physics;

use crate::assets::QueuedFetcher;
use crate::core::config::SessionConfig;
use crate::render::{Frame, HeadlessSurface};
use crate::scene::ShapeKind;

use super::Session;

/// Engine loaded, scene initialised, assets completed by hand
pub(super) fn session() -> Session {
    let mut session = Session::new(SessionConfig::default(), Box::new(HeadlessSurface::new(640, 480)))
        .with_fetcher(Box::new(QueuedFetcher::new()));
    session.initialize_engine();
    session.initialize_scene(false, "#101018");
    session
}

/// A box registered as `id` and added to the scene
pub(super) fn cube(session: &mut Session, id: &str) {
    session.create_primitive(id, ShapeKind::Box, "#ff0000");
    session.add_to_scene(id);
}

pub(super) fn headless(session: &Session) -> &HeadlessSurface {
    session
        .surface()
        .as_any()
        .downcast_ref::<HeadlessSurface>()
        .expect("tests draw onto a headless surface")
}

pub(super) fn last_frame(session: &Session) -> Option<&Frame> {
    headless(session).last_frame()
}

pub(super) fn queue(session: &mut Session) -> &mut QueuedFetcher {
    session
        .fetcher_mut()
        .as_any_mut()
        .downcast_mut::<QueuedFetcher>()
        .expect("tests fetch through a queue")
}

pub(super) fn number(session: &mut Session, id: &str, path: &str) -> f64 {
    session
        .get_property(id, path)
        .as_number()
        .unwrap_or_else(|| panic!("{}.{} is not a number", id, path))
}
