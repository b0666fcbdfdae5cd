//! State machine for the chapter video lifecycle
//!
//! States: NoVideo → Processing → Ready. Replacing a ready video goes back
//! through Processing; a failed asset creation falls back to NoVideo.

use serde::{Deserialize, Serialize};

pub use coursecraft_common::StateError;

use crate::domain::entities::MuxData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoState {
    NoVideo,
    /// Asset creation requested, no record persisted yet
    Processing,
    /// Asset recorded in mux_data
    Ready,
}

impl VideoState {
    /// Persisted state of a chapter's video
    pub fn from_record(mux_data: Option<&MuxData>) -> Self {
        match mux_data {
            Some(_) => Self::Ready,
            None => Self::NoVideo,
        }
    }

    pub fn valid_transitions(&self) -> &'static [VideoState] {
        match self {
            Self::NoVideo => &[Self::Processing],
            Self::Processing => &[Self::Ready, Self::NoVideo],
            Self::Ready => &[Self::Processing, Self::NoVideo],
        }
    }
}

impl std::fmt::Display for VideoState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoVideo => write!(f, "no_video"),
            Self::Processing => write!(f, "processing"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoEvent {
    /// A new video url was set and an asset requested
    Attach,
    /// Asset created and its record persisted
    Recorded,
    /// Asset creation or persistence failed (compensated)
    Fail,
    /// Video released together with its chapter
    Detach,
}

impl std::fmt::Display for VideoEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attach => write!(f, "attach"),
            Self::Recorded => write!(f, "recorded"),
            Self::Fail => write!(f, "fail"),
            Self::Detach => write!(f, "detach"),
        }
    }
}

pub struct VideoStateMachine;

impl VideoStateMachine {
    pub fn transition(current: VideoState, event: VideoEvent) -> Result<VideoState, StateError> {
        let next = match (current, event) {
            (VideoState::NoVideo | VideoState::Ready, VideoEvent::Attach) => VideoState::Processing,
            (VideoState::Processing, VideoEvent::Recorded) => VideoState::Ready,
            (VideoState::Processing, VideoEvent::Fail) => VideoState::NoVideo,
            (VideoState::Ready, VideoEvent::Detach) => VideoState::NoVideo,
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };
        Ok(next)
    }

    pub fn can_transition(current: VideoState, event: VideoEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
