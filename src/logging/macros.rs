// SPDX-License-Identifier: Apache-2.0 OR MIT
// Macros for building log attributes

/// Build an [`Attributes`](crate::logging::Attributes) mapping
///
/// Pairs keep their written order; a repeated key replaces the earlier
/// value in place.
///
/// # Examples
/// ```
/// use testlog::attrs;
///
/// let empty = attrs!();
/// assert!(empty.is_empty());
///
/// let attrs = attrs!("machine" => "server", "unit" => "nginx.service");
/// assert_eq!(attrs.machine_name(), Some("server"));
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::logging::Attributes::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut attrs = $crate::logging::Attributes::new();
        $(attrs.insert($key, $value);)+
        attrs
    }};
}
