//! Scene switching port.
//!
//! In a single-window egui app a "scene" is just which root view the frame
//! loop draws. The flow orchestrator fires switch requests through the
//! [`SceneLoader`] trait; the app reads the director's current scene each
//! frame.

/// Root views the frame loop can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scene {
    #[default]
    Title,
    Game,
}

/// Fire-and-forget requests to swap the active screen.
pub trait SceneLoader {
    fn load_title_scene(&mut self);
    fn load_game_scene(&mut self);
}

/// Production scene switcher: records the requested scene for the frame loop.
#[derive(Default)]
pub struct SceneDirector {
    current: Scene,
}

impl SceneDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Scene {
        self.current
    }
}

impl SceneLoader for SceneDirector {
    fn load_title_scene(&mut self) {
        if self.current != Scene::Title {
            tracing::info!("Switching to title scene");
        }
        self.current = Scene::Title;
    }

    fn load_game_scene(&mut self) {
        if self.current != Scene::Game {
            tracing::info!("Switching to game scene");
        }
        self.current = Scene::Game;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn director_tracks_requests() {
        let mut director = SceneDirector::new();
        assert_eq!(director.current(), Scene::Title);

        director.load_game_scene();
        assert_eq!(director.current(), Scene::Game);

        director.load_title_scene();
        assert_eq!(director.current(), Scene::Title);
    }
}
