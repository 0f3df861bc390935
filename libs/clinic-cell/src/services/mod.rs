mod affiliation;
mod registry;

pub use affiliation::AffiliationService;
pub use registry::RegistryService;
