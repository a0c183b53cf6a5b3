//! Operation lifecycle macros
//!
//! Every event carries `component`, `op` and `event`; callers append their
//! own fields after the required ones.

#[doc(hidden)]
#[macro_export]
macro_rules! __folio_op_event {
    ($level:ident, $op:expr, $event:expr, $($field:tt)*) => {
        $crate::tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($field)*
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use folio_core::log_op_start;
/// log_op_start!("get_page");
/// log_op_start!("get_page", page_id = 42);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__folio_op_event!(
            info,
            $op,
            $crate::folio_core_types::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use folio_core::log_op_end;
/// log_op_end!("get_page", duration_ms = 3);
/// log_op_end!("list_pages", duration_ms = 3, result_len = 0);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__folio_op_event!(
            info,
            $op,
            $crate::folio_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log a failed operation with its stable error code
///
/// `err` is anything convertible into [`ExError`](crate::errors::ExError).
///
/// ```
/// # use folio_core::{log_op_error, errors::FolioError};
/// let err = FolioError::PageNotFound { page_id: 42 };
/// log_op_error!("get_page", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__folio_op_event!(
            error,
            $op,
            $crate::folio_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($($field)*)?
        )
    }};
}
