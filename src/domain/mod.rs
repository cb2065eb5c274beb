pub mod program_name;

pub use program_name::ProgramName;
