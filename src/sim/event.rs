//! Events emitted during a simulation step.
//! The presentation layer consumes these for sound.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeathCause {
    Spike,
    Ceiling,
    Wall,
    FellOut,
}

impl DeathCause {
    pub fn describe(self) -> &'static str {
        match self {
            DeathCause::Spike => "spiked",
            DeathCause::Ceiling => "hit a ceiling",
            DeathCause::Wall => "crashed into a wall",
            DeathCause::FellOut => "fell off the screen",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// Menu → Playing.
    Started,
    /// Dead/Win → Playing. `attempt` is the counter after the retry.
    Retry { attempt: u32 },
    Jumped,
    Landed,
    PlayerKilled { cause: DeathCause },
    LevelComplete,
}
