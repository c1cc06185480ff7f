//! Duplicate item records.
//!
//! A [`DuplicateItem`] is one candidate file handed over by the scan stage,
//! already tagged with the [`GroupId`] of the duplicate group it belongs to.
//! Apart from the `checked` removal flag, items are never modified by the
//! selection engine.
//!
//! # Example
//!
//! ```
//! use dupekeep::duplicates::DuplicateItem;
//! use std::time::Duration;
//!
//! let item = DuplicateItem::new("/videos/a.mp4", "g1")
//!     .with_size(1024)
//!     .with_duration(Duration::from_secs(90))
//!     .with_fps(29.97);
//!
//! assert_eq!(item.duration_secs(), 90);
//! assert!(!item.checked);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Opaque identifier shared by all members of one duplicate group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Create a group id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for GroupId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One candidate duplicate file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateItem {
    /// Path of the file, unique within the working set
    pub path: PathBuf,
    /// Group this item is a duplicate in
    pub group_id: GroupId,
    /// File size in bytes
    pub size_bytes: u64,
    /// Frame size in pixels (0 for non-visual media)
    #[serde(default)]
    pub frame_size: u64,
    /// Video bitrate in kbit/s
    #[serde(default)]
    pub bitrate_kbps: u32,
    /// Playback duration
    #[serde(default, with = "duration_millis", rename = "duration_ms")]
    pub duration: Duration,
    /// Frames per second
    #[serde(default)]
    pub fps: f32,
    /// Audio sample rate in Hz
    #[serde(default)]
    pub audio_sample_rate: u32,
    /// Whether the file is a still image rather than a video
    #[serde(default)]
    pub is_image: bool,
    /// Marked for removal
    #[serde(default)]
    pub checked: bool,
}

impl DuplicateItem {
    /// Create an item with all metrics zeroed and the removal flag cleared.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, group_id: impl Into<GroupId>) -> Self {
        Self {
            path: path.into(),
            group_id: group_id.into(),
            size_bytes: 0,
            frame_size: 0,
            bitrate_kbps: 0,
            duration: Duration::ZERO,
            fps: 0.0,
            audio_sample_rate: 0,
            is_image: false,
            checked: false,
        }
    }

    /// Set the file size in bytes.
    #[must_use]
    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    /// Set the frame size in pixels.
    #[must_use]
    pub fn with_frame_size(mut self, frame_size: u64) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Set the bitrate in kbit/s.
    #[must_use]
    pub fn with_bitrate(mut self, bitrate_kbps: u32) -> Self {
        self.bitrate_kbps = bitrate_kbps;
        self
    }

    /// Set the playback duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the frame rate.
    #[must_use]
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the audio sample rate in Hz.
    #[must_use]
    pub fn with_audio_sample_rate(mut self, audio_sample_rate: u32) -> Self {
        self.audio_sample_rate = audio_sample_rate;
        self
    }

    /// Mark the item as an image.
    #[must_use]
    pub fn with_image(mut self, is_image: bool) -> Self {
        self.is_image = is_image;
        self
    }

    /// Set the initial removal flag.
    #[must_use]
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Duration truncated to whole seconds.
    #[must_use]
    pub fn duration_secs(&self) -> u64 {
        self.duration.as_secs()
    }

    /// Whether `other` belongs to the same group under a different path.
    #[must_use]
    pub fn is_peer_of(&self, other: &DuplicateItem) -> bool {
        self.group_id == other.group_id && self.path != other.path
    }
}

/// Serialize a `Duration` as whole milliseconds.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
