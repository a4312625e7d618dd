use super::ScaleClient;
use crate::error::Result;
use crate::model::{JobData, NewJob};

impl ScaleClient {
    /// Queues a job and returns the location of the new job.
    pub fn queue_job(&self, job_type_id: i64, job_data: &JobData) -> Result<String> {
        let body = NewJob {
            job_type_id,
            job_data,
        };
        self.post_created("/queue/new-job/", &body)
    }
}
