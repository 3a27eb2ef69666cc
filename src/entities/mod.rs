// 👷 Entity Models - the parties being financially evaluated
// Technicians (crew members / contractors) and Job Sources (where work
// comes from). Both resolve to a uniform EntityRecord the engines consume.

pub mod job_source;
pub mod rate;
pub mod registry;
pub mod technician;

pub use job_source::JobSource;
pub use rate::RateStructure;
pub use registry::{EntityKind, EntityRecord, EntityRegistry};
pub use technician::Technician;
