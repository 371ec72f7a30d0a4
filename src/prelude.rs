#[doc(no_inline)]
pub use crate::policy::BufPolicy as _;
#[doc(no_inline)]
pub use crate::source::ByteSource as _;
#[doc(no_inline)]
pub use crate::Record as _;
