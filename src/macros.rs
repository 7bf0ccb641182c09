/// Build a field accessor for a JSON record.
///
/// The accessor yields the value under `key` unless it is absent or `null`,
/// which is what "present" means for every tolerant lookup in the normalizer.
/// Usage: `field_accessor!("executedAt")`
#[macro_export]
macro_rules! field_accessor {
    ($key:literal) => {{
        fn get(record: &::serde_json::Value) -> Option<&::serde_json::Value> {
            record.get($key).filter(|value| !value.is_null())
        }
        get as $crate::domain::dashboard::normalizer::Accessor
    }};
}

/// Generate accessor functions for global reactive signals.
///
/// Usage:
/// `global_signals! {
///     pub fn1 => field1: Type1,
///     fn2 => field2: Type2,
/// }`
#[macro_export]
macro_rules! global_signals {
    ( $( $vis:vis $name:ident => $field:ident : $ty:ty ),+ $(,)? ) => {
        $(
            $vis fn $name() -> ::leptos::RwSignal<$ty> {
                $crate::global_state::globals().$field
            }
        )+
    };
}
