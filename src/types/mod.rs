//! Host-side data types.

pub mod column;
pub mod host_type;
pub mod lob;
pub mod row;
pub mod sql_type;
pub mod value;

pub use column::{Column, ColumnInfo};
pub use host_type::HostType;
pub use lob::{LobHandle, LobKind};
pub use row::Row;
pub use sql_type::SqlType;
pub use value::HostValue;
