/// Build a `Vec<RowValues>` parameter list from anything convertible.
///
/// ```
/// use household_tasks::{RowValues, row_params};
///
/// let owner: Option<i64> = None;
/// let params = row_params![7_i64, "Buy milk", owner];
/// assert_eq!(params[1], RowValues::Text("Buy milk".to_string()));
/// assert!(params[2].is_null());
/// ```
#[macro_export]
macro_rules! row_params {
    () => {
        ::std::vec::Vec::<$crate::RowValues>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::RowValues::from($value)),+]
    };
}
