//! Coded logging macros
//!
//! Every macro accepts trailing `"key" => value` pairs. Values only need
//! `Display`; they are formatted once and borrowed by the support functions in
//! `logging`.

/// Borrow formatted context pairs for the `*_with_context` functions
#[doc(hidden)]
pub fn as_pairs<'a>(context: &'a [(&'a str, String)]) -> Vec<(&'a str, &'a str)> {
    context.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

/// Log an error with its code, an optional `location = ...` and context
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, location = $location:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),*];
        $crate::logging::log_error_with_context(
            $code,
            $message,
            Some($location),
            $crate::logging::macros::as_pairs(&context),
        )
    }};

    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),*];
        $crate::logging::log_error_with_context(
            $code,
            $message,
            None,
            $crate::logging::macros::as_pairs(&context),
        )
    }};
}

/// Log a completed step with its success code
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),*];
        $crate::logging::log_success_with_context(
            $code,
            $message,
            $crate::logging::macros::as_pairs(&context),
        )
    }};
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),*];
        $crate::logging::log_info_with_context($message, $crate::logging::macros::as_pairs(&context))
    }};
}

#[macro_export]
macro_rules! log_warning {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),*];
        $crate::logging::log_warning_with_context($message, $crate::logging::macros::as_pairs(&context))
    }};
}

/// Log a debug message
///
/// Context values are only formatted when debug output is enabled.
#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),*];
            $crate::logging::log_debug_with_context($message, $crate::logging::macros::as_pairs(&context))
        }
    }};
}
