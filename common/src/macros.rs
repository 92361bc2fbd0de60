/// Build a `PathBuf` out of a list of components.
///
/// ```
/// use std::path::PathBuf;
/// use reglog_common::makepath;
///
/// let p: PathBuf = makepath!("/home", "user", ".config");
/// assert_eq!(PathBuf::from("/home/user/.config"), p);
/// ```
///
#[macro_export]
macro_rules! makepath {
    ($($item:expr),+) => {
        [
        $(::std::path::PathBuf::from($item),)+
        ]
        .iter()
        .collect::<::std::path::PathBuf>()
    };
}
