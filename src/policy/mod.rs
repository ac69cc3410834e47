//! Pure press-duration policies.
//!
//! Both policies first place a held duration into a [`Band`], then map
//! (band, mode) to their output. Bands are closed at the lower end:
//!
//! | Whole seconds `s`          | Band     |
//! |----------------------------|----------|
//! | `s < short_max`            | `Short`  |
//! | `short_max <= s < medium`  | `Medium` |
//! | `medium_max <= s < long`   | `Long`   |
//! | `s >= long_max`            | `Cancel` |

pub mod dispatch;
pub mod led;

use core::time::Duration;

use crate::config::Thresholds;
use crate::tracker::whole_secs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Short,
    Medium,
    Long,
    Cancel,
}

impl Thresholds {
    /// Band for a held duration, after truncation to whole seconds.
    pub fn band(&self, held: Duration) -> Band {
        let secs = whole_secs(held);
        if secs >= self.long_max_secs {
            Band::Cancel
        } else if secs >= self.medium_max_secs {
            Band::Long
        } else if secs >= self.short_max_secs {
            Band::Medium
        } else {
            Band::Short
        }
    }
}
