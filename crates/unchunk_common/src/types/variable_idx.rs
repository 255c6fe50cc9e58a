oxc_index::define_index_type! {
  /// Per-module sequential id of a local binding, assigned in declaration
  /// order. Never persisted across modules.
  #[derive(Default)]
  pub struct VariableIdx = u32;
}
