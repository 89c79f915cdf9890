use derivative::Derivative;

/// Knobs for a reflection pass. The defaults match what most callers
/// want.
#[derive(Clone, Debug, Derivative, Eq, PartialEq)]
#[derivative(Default)]
pub struct ReflectOptions {
    /// Reported as the entry point name when the module declares none.
    #[derivative(Default(value = "\"none\".to_owned()"))]
    pub missing_entry_point: String,
    /// Name given to struct members that carry no debug name.
    #[derivative(Default(value = "\"unnamed\".to_owned()"))]
    pub unnamed: String,
    /// Whether to collect user-defined stage inputs.
    #[derivative(Default(value = "true"))]
    pub stage_inputs: bool,
}
