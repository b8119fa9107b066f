//! TypeScript rendering helpers.

pub mod classes;
pub mod enums;
pub mod mapper;

pub use classes::ClassBuilder;
pub use enums::{ENUM_PROBE_CEILING, EnumMember, probe_members, to_pascal_case};
pub use mapper::TypeMapper;
