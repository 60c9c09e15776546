//! Compiler settings

/// Per-compilation configuration supplied by the embedding host
#[derive(Debug, Clone)]
pub struct CompilerSettings {
    /// Loop iteration budget enforced by the runtime on user functions.
    /// Zero disables the counter.
    pub max_loop_counter: u32,
    /// Name of the script's designated entry point function
    pub entry_point: String,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            max_loop_counter: 1_000_000,
            entry_point: "execute".to_string(),
        }
    }
}
