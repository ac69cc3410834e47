//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter           | Implements       | Connects to                     |
//! |-------------------|------------------|---------------------------------|
//! | `board`           | Board            | all output adapters below       |
//! | `input_event`     | PressEdgeSource  | Linux evdev `/dev/input/event*` |
//! | `register_poll`   | PressEdgeSource  | controller register over I2C    |
//! | `led_script`      | LedSink          | external LED script             |
//! | `system_commands` | SystemActions    | reboot / shutdown / reset tools |
//! | `marker_file`     | ResetMarker      | marker file on disk             |
//! | `log_sink`        | EventSink        | `log` output                    |
//! | `time`            | Clock            | `std::time::Instant`            |
//!
//! `board_init` holds the one-time start-up steps that are not ports.

pub mod board;
pub mod board_init;
pub mod input_event;
pub mod led_script;
pub mod log_sink;
pub mod marker_file;
pub mod register_poll;
pub mod system_commands;
pub mod time;
pub(super) mod utils;
