//! Keeps a media player inside the current selection
//!
//! The player owns its position; this module only reads it on each tick and
//! issues explicit pauses and seeks. Playback never runs past the selection
//! end and always (re)starts from the selection start.

use crate::error::{Result, TrimError};
use crate::types::TimeRange;

/// Minimal control surface of a media element
pub trait MediaPlayer {
    /// Current position in seconds
    fn current_time(&self) -> f64;
    fn is_playing(&self) -> bool;
    /// Start playback from the current position
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn seek(&mut self, time: f64);
}

/// Snapshot of the attached player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub current_time: f64,
    pub is_playing: bool,
}

/// What a position tick did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Position inside the selection, nothing done
    Continue,
    /// Reached the selection end: paused and rewound to start
    LoopBoundary,
    /// Playing before the selection start: jumped forward to start
    ClampedToStart,
}

/// Binds one player to one track's selection
#[derive(Debug)]
pub struct PlaybackSynchronizer<P: MediaPlayer> {
    player: P,
    range: TimeRange,
}

impl<P: MediaPlayer> PlaybackSynchronizer<P> {
    /// Attach `player` with the track's current selection
    pub fn attach(player: P, range: TimeRange) -> Self {
        log::debug!("attach: Player attached with selection {}..{}", range.start, range.end);
        Self { player, range }
    }

    /// Release the player
    pub fn detach(self) -> P {
        self.player
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Selection bounds the player is held to
    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            current_time: self.player.current_time(),
            is_playing: self.player.is_playing(),
        }
    }

    /// Handle a playback position update
    pub fn on_tick(&mut self) -> TickOutcome {
        let current = self.player.current_time();
        let start = self.range.start as f64;

        if current >= self.range.end as f64 {
            self.player.pause();
            self.player.seek(start);
            return TickOutcome::LoopBoundary;
        }

        if current < start && self.player.is_playing() {
            self.player.seek(start);
            return TickOutcome::ClampedToStart;
        }

        TickOutcome::Continue
    }

    /// End of media or explicit stop: rewind to the selection start
    pub fn on_ended(&mut self) {
        if self.player.is_playing() {
            self.player.pause();
        }
        self.player.seek(self.range.start as f64);
    }

    /// Play from the selection start, or pause in place
    ///
    /// Starting never resumes mid-segment. An empty selection is rejected
    /// before the player is touched.
    pub fn toggle_playback(&mut self) -> Result<PlaybackState> {
        if self.range.is_empty() {
            return Err(TrimError::InvalidSelection(format!(
                "end ({}s) must be greater than start ({}s)",
                self.range.end, self.range.start
            )));
        }

        if self.player.is_playing() {
            self.player.pause();
        } else {
            self.player.seek(self.range.start as f64);
            self.player.play()?;
            log::debug!("toggle_playback: Playing {}s..{}s", self.range.start, self.range.end);
        }

        Ok(self.state())
    }

    /// Pause if playing; returns whether a pause was issued
    pub fn pause(&mut self) -> bool {
        if self.player.is_playing() {
            self.player.pause();
            true
        } else {
            false
        }
    }

    /// Adopt new selection bounds
    ///
    /// A position outside the new bounds is moved to the new start, pausing
    /// first so the player never runs outside the selection. Returns whether
    /// the player was repositioned.
    pub fn selection_changed(&mut self, range: TimeRange) -> bool {
        self.range = range;
        let current = self.player.current_time();
        if range.contains(current) {
            return false;
        }

        if self.player.is_playing() {
            self.player.pause();
        }
        self.player.seek(range.start as f64);
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum PlayerCall {
        Play,
        Pause,
        Seek(f64),
    }

    /// Scripted player recording every control call
    #[derive(Debug, Default)]
    pub(crate) struct FakePlayer {
        pub time: f64,
        pub playing: bool,
        pub refuse_play: bool,
        pub calls: Vec<PlayerCall>,
    }

    impl MediaPlayer for FakePlayer {
        fn current_time(&self) -> f64 {
            self.time
        }

        fn is_playing(&self) -> bool {
            self.playing
        }

        fn play(&mut self) -> Result<()> {
            if self.refuse_play {
                return Err(TrimError::Playback("autoplay blocked".to_string()));
            }
            self.calls.push(PlayerCall::Play);
            self.playing = true;
            Ok(())
        }

        fn pause(&mut self) {
            self.calls.push(PlayerCall::Pause);
            self.playing = false;
        }

        fn seek(&mut self, time: f64) {
            self.calls.push(PlayerCall::Seek(time));
            self.time = time;
        }
    }

    fn playing_at(time: f64) -> FakePlayer {
        FakePlayer {
            time,
            playing: true,
            ..FakePlayer::default()
        }
    }

    #[test]
    fn test_tick_past_end_pauses_and_rewinds() {
        let mut sync = PlaybackSynchronizer::attach(playing_at(41.0), TimeRange::new(10, 40));
        assert_eq!(sync.on_tick(), TickOutcome::LoopBoundary);
        assert_eq!(sync.player().calls, vec![PlayerCall::Pause, PlayerCall::Seek(10.0)]);
        assert!(!sync.is_playing());
        assert_eq!(sync.state().current_time, 10.0);
    }

    #[test]
    fn test_tick_at_exact_end_is_boundary() {
        let mut sync = PlaybackSynchronizer::attach(playing_at(40.0), TimeRange::new(10, 40));
        assert_eq!(sync.on_tick(), TickOutcome::LoopBoundary);
    }

    #[test]
    fn test_tick_before_start_while_playing_jumps_to_start() {
        let mut sync = PlaybackSynchronizer::attach(playing_at(3.0), TimeRange::new(10, 40));
        assert_eq!(sync.on_tick(), TickOutcome::ClampedToStart);
        assert_eq!(sync.player().calls, vec![PlayerCall::Seek(10.0)]);
        assert!(sync.is_playing());
    }

    #[test]
    fn test_tick_before_start_while_paused_is_left_alone() {
        let player = FakePlayer {
            time: 3.0,
            ..FakePlayer::default()
        };
        let mut sync = PlaybackSynchronizer::attach(player, TimeRange::new(10, 40));
        assert_eq!(sync.on_tick(), TickOutcome::Continue);
        assert!(sync.player().calls.is_empty());
    }

    #[test]
    fn test_toggle_twice_plays_from_start_then_pauses_in_place() {
        let player = FakePlayer {
            time: 27.0,
            ..FakePlayer::default()
        };
        let mut sync = PlaybackSynchronizer::attach(player, TimeRange::new(5, 15));

        let state = sync.toggle_playback().unwrap();
        assert!(state.is_playing);
        assert_eq!(state.current_time, 5.0);

        sync.player_mut().time = 8.5;
        let state = sync.toggle_playback().unwrap();
        assert!(!state.is_playing);
        assert_eq!(state.current_time, 8.5);

        assert_eq!(
            sync.player().calls,
            vec![PlayerCall::Seek(5.0), PlayerCall::Play, PlayerCall::Pause]
        );
    }

    #[test]
    fn test_toggle_rejects_empty_selection() {
        let mut sync = PlaybackSynchronizer::attach(FakePlayer::default(), TimeRange::new(7, 7));
        assert!(matches!(sync.toggle_playback(), Err(TrimError::InvalidSelection(_))));
        assert!(sync.player().calls.is_empty());
    }

    #[test]
    fn test_toggle_surfaces_player_refusal() {
        let player = FakePlayer {
            refuse_play: true,
            ..FakePlayer::default()
        };
        let mut sync = PlaybackSynchronizer::attach(player, TimeRange::new(0, 10));
        assert!(matches!(sync.toggle_playback(), Err(TrimError::Playback(_))));
        assert!(!sync.is_playing());
    }

    #[test]
    fn test_selection_change_outside_position_pauses_before_seek() {
        let mut sync = PlaybackSynchronizer::attach(playing_at(12.0), TimeRange::new(10, 40));
        assert!(sync.selection_changed(TimeRange::new(20, 30)));
        assert_eq!(sync.player().calls, vec![PlayerCall::Pause, PlayerCall::Seek(20.0)]);
        assert_eq!(sync.range(), TimeRange::new(20, 30));
    }

    #[test]
    fn test_selection_change_containing_position_keeps_playing() {
        let mut sync = PlaybackSynchronizer::attach(playing_at(25.0), TimeRange::new(10, 40));
        assert!(!sync.selection_changed(TimeRange::new(20, 30)));
        assert!(sync.is_playing());
        assert!(sync.player().calls.is_empty());
    }

    #[test]
    fn test_ended_rewinds_to_start() {
        let mut sync = PlaybackSynchronizer::attach(playing_at(39.0), TimeRange::new(10, 40));
        sync.on_ended();
        assert!(!sync.is_playing());
        assert_eq!(sync.state().current_time, 10.0);
    }
}
