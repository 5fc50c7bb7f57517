/// WebAssembly proposals the wasmi engine accepts beyond the MVP.
///
/// Modules using a disabled proposal fail to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WasmiEngineConfig {
    pub mutable_global: bool,
    pub sign_extension: bool,
    pub saturating_float_to_int: bool,
    pub multi_value: bool,
    pub bulk_memory: bool,
    pub reference_types: bool,
}

impl Default for WasmiEngineConfig {
    fn default() -> Self {
        Self {
            mutable_global: true,
            sign_extension: true,
            saturating_float_to_int: true,
            multi_value: true,
            bulk_memory: true,
            reference_types: true,
        }
    }
}

impl WasmiEngineConfig {
    /// Accepts only the WebAssembly MVP.
    pub fn mvp() -> Self {
        Self {
            mutable_global: false,
            sign_extension: false,
            saturating_float_to_int: false,
            multi_value: false,
            bulk_memory: false,
            reference_types: false,
        }
    }

    pub fn to_wasmi_config(&self) -> wasmi::Config {
        let mut config = wasmi::Config::default();
        config
            .wasm_mutable_global(self.mutable_global)
            .wasm_sign_extension(self.sign_extension)
            .wasm_saturating_float_to_int(self.saturating_float_to_int)
            .wasm_multi_value(self.multi_value)
            .wasm_bulk_memory(self.bulk_memory)
            .wasm_reference_types(self.reference_types);
        config
    }
}
