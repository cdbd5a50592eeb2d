pub mod app;
pub mod events;
pub mod gamification;
pub mod onboarding;
pub mod ratelimit;
pub mod universities;
pub mod workspace;

// Re-export commonly used types for convenience.
pub use app::StudyApp;
pub use events::{AppEvent, EventLog, EventType};
pub use onboarding::{AnswerPatch, AnswerSet, AnswerStore, OnboardingSession, Segment, Step, StepId};
pub use workspace::AppConfig;
