pub mod campaign_repo;
pub mod lead_repo;
pub mod profile_repo;
pub mod settings_repo;

pub use campaign_repo::CampaignRepo;
pub use lead_repo::LeadRepo;
pub use profile_repo::ProfileRepo;
pub use settings_repo::DashboardSettingsRepo;
