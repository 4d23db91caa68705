pub mod user_repo;
pub use user_repo::UserRepository;
pub mod participant_repo;
pub use participant_repo::ParticipantRepository;
pub mod legal_repo;
pub use legal_repo::LegalDocumentRepository;
