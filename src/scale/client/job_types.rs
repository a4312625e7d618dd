use super::ScaleClient;
use crate::error::Result;
use crate::model::{JobType, Warning};

impl ScaleClient {
    /// Lists job types, optionally filtered by name.
    pub fn list_job_types(&self, name: Option<&str>) -> Result<Vec<JobType>> {
        let query: Vec<(&str, &str)> = name.map(|n| ("name", n)).into_iter().collect();
        self.list_all("/job-types/", &query)
    }

    pub fn get_job_type(&self, id: i64) -> Result<JobType> {
        self.get(&format!("/job-types/{}/", id))
    }

    /// Finds the job type registered under `name` and `version`.
    pub fn find_job_type(&self, name: &str, version: &str) -> Result<Option<JobType>> {
        let found = self
            .list_job_types(Some(name))?
            .into_iter()
            .find(|jt| jt.name == name && jt.version == version);
        Ok(found)
    }

    pub fn validate_job_type(&self, job_type: &JobType) -> Result<Vec<Warning>> {
        self.validate("/job-types/validation/", job_type)
    }

    pub fn create_job_type(&self, job_type: &JobType) -> Result<JobType> {
        self.post("/job-types/", job_type)
    }

    pub fn update_job_type(&self, id: i64, job_type: &JobType) -> Result<JobType> {
        self.patch(&format!("/job-types/{}/", id), job_type)
    }
}
