pub mod new_project;
pub mod notification;
pub mod open_project;
pub mod project;
pub mod startup;
pub mod test_case_creation;
pub mod workspace_management;

pub use new_project::NewProjectMediator;
pub use notification::NotificationMediator;
pub use open_project::OpenProjectMediator;
pub use project::ProjectMediator;
pub use startup::StartupMediator;
pub use test_case_creation::TestCaseCreationMediator;
pub use workspace_management::WorkspaceManagementMediator;
