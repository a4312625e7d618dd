use super::ScaleClient;
use crate::error::Result;
use crate::model::{Warning, Workspace};

impl ScaleClient {
    pub fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        self.list_all("/workspaces/", &[])
    }

    pub fn get_workspace(&self, id: i64) -> Result<Workspace> {
        self.get(&format!("/workspaces/{}/", id))
    }

    pub fn validate_workspace(&self, workspace: &Workspace) -> Result<Vec<Warning>> {
        self.validate("/workspaces/validation/", workspace)
    }

    pub fn create_workspace(&self, workspace: &Workspace) -> Result<Workspace> {
        self.post("/workspaces/", workspace)
    }

    pub fn update_workspace(&self, id: i64, workspace: &Workspace) -> Result<Workspace> {
        self.patch(&format!("/workspaces/{}/", id), workspace)
    }
}
