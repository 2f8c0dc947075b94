//! Settings persisted across runs.
//!
//! A plain-text file of newline-separated scalars in a fixed order:
//! clear color R, G, B; overlay flag (0/1); camera position X, Y, Z;
//! camera front X, Y, Z. Loading tolerates a missing, short, or corrupt
//! file; whatever cannot be read keeps its compiled-in default.

use std::path::Path;

use glam::Vec3;

use crate::error::IsleError;
use crate::scene::layout;

/// Default file name, relative to the working directory.
pub const STATE_FILE: &str = "program_state.txt";

/// The handful of settings written on clean shutdown and read at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistedState {
    /// Background clear color (RGB, 0..=1).
    pub clear_color: [f32; 3],
    /// Whether the debug overlay was open.
    pub overlay_enabled: bool,
    /// Camera position.
    pub camera_position: Vec3,
    /// Camera front vector (converted back to yaw/pitch on restore).
    pub camera_front: Vec3,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            clear_color: [0.0; 3],
            overlay_enabled: false,
            camera_position: layout::CAMERA_START,
            camera_front: Vec3::NEG_Z,
        }
    }
}

impl PersistedState {
    /// Load from `path`. Any field that cannot be read keeps its default;
    /// a missing file is not an error.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let mut state = Self::default();
        let Ok(content) = std::fs::read_to_string(path) else {
            log::info!("no persisted state at {}, using defaults", path.display());
            return state;
        };

        // Fields are parsed positionally; the first malformed line ends
        // the read, leaving the remaining fields at their defaults.
        let values: Vec<f32> = content
            .lines()
            .map(str::trim)
            .map_while(|line| line.parse::<f32>().ok())
            .collect();

        for (slot, value) in state.clear_color.iter_mut().zip(&values) {
            *slot = *value;
        }
        if let Some(flag) = values.get(3) {
            state.overlay_enabled = *flag != 0.0;
        }
        if values.len() >= 7 {
            state.camera_position = Vec3::new(values[4], values[5], values[6]);
        }
        if values.len() >= 10 {
            state.camera_front = Vec3::new(values[7], values[8], values[9]);
        }
        state
    }

    /// Save to `path`, always writing every field in the fixed order.
    ///
    /// # Errors
    ///
    /// Returns [`IsleError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), IsleError> {
        let mut out = String::new();
        for value in [
            self.clear_color[0],
            self.clear_color[1],
            self.clear_color[2],
            f32::from(u8::from(self.overlay_enabled)),
            self.camera_position.x,
            self.camera_position.y,
            self.camera_position.z,
            self.camera_front.x,
            self.camera_front.y,
            self.camera_front.z,
        ] {
            out.push_str(&format!("{value}\n"));
        }
        std::fs::write(path, out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("isleview-state-{name}-{}", std::process::id()))
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_path("roundtrip");
        let state = PersistedState {
            clear_color: [0.1, 0.2, 0.3],
            overlay_enabled: true,
            camera_position: Vec3::new(14.4107, 0.438_836, 19.0486),
            camera_front: Vec3::new(0.0, -0.2, -0.979_796).normalize(),
        };
        state.save(&path).unwrap();
        let loaded = PersistedState::load(&path);
        std::fs::remove_file(&path).unwrap();

        for (a, b) in state.clear_color.iter().zip(loaded.clear_color.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
        assert!(loaded.overlay_enabled);
        assert!((state.camera_position - loaded.camera_position).length() < 1e-4);
        assert!((state.camera_front - loaded.camera_front).length() < 1e-4);
    }

    #[test]
    fn clear_color_components_assign_positionally() {
        let path = temp_path("color");
        std::fs::write(&path, "0.25\n0.5\n0.75\n").unwrap();
        let loaded = PersistedState::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.clear_color, [0.25, 0.5, 0.75]);
        assert!(!loaded.overlay_enabled);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let loaded = PersistedState::load(Path::new("does/not/exist.txt"));
        assert_eq!(loaded, PersistedState::default());
    }

    #[test]
    fn short_file_keeps_defaults_for_missing_fields() {
        let path = temp_path("short");
        std::fs::write(&path, "0.5\n0.25\n").unwrap();
        let loaded = PersistedState::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.clear_color[0], 0.5);
        assert_eq!(loaded.clear_color[1], 0.25);
        // Everything after the short read stays default.
        assert_eq!(loaded.clear_color[2], 0.0);
        assert!(!loaded.overlay_enabled);
        assert_eq!(loaded.camera_position, layout::CAMERA_START);
    }

    #[test]
    fn corrupt_line_ends_the_read_silently() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "0.1\n0.2\nnot-a-number\n9\n9\n9\n9\n").unwrap();
        let loaded = PersistedState::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.clear_color[0], 0.1);
        assert_eq!(loaded.clear_color[1], 0.2);
        assert_eq!(loaded.clear_color[2], 0.0);
        assert_eq!(loaded.camera_position, layout::CAMERA_START);
    }
}
