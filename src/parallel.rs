use std::sync::Arc;
use tokio::sync::Semaphore;
use std::future::Future;
use crate::error::ReadmeError;

/// Executes tasks in parallel with a specified concurrency limit
///
/// Results come back in submission order. A failing task never cancels its siblings.
pub struct ParallelProcessor {
    semaphore: Arc<Semaphore>,
}

impl ParallelProcessor {
    /// Creates a new parallel processor with the specified concurrency limit
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Processes a collection of futures concurrently and returns their results
    pub async fn process<F, T>(&self, tasks: Vec<F>) -> Vec<Result<T, ReadmeError>>
    where
        F: Future<Output = Result<T, ReadmeError>> + Send + 'static,
        T: Send + 'static,
    {
        let mut handles = Vec::with_capacity(tasks.len());

        for task in tasks {
            let semaphore = Arc::clone(&self.semaphore);
            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| ReadmeError::Message(format!("Semaphore closed: {}", e)))?;
                task.await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(match handle.await {
                Ok(result) => result,
                Err(e) => Err(ReadmeError::Message(format!("Task failed: {}", e))),
            });
        }
        results
    }
}
