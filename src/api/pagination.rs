// src/api/pagination.rs
//! Cursor pagination over Notion list endpoints.

use super::responses::PaginatedResponse;
use crate::error::AppError;

/// Items gathered across every fetched batch.
#[derive(Debug)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub batches: u32,
}

/// Fetches batches until the cursor runs out or `max_batches` is reached.
///
/// `fetch_fn` receives the page size and the cursor of the next batch.
pub async fn fetch_all_pages<T, F, Fut>(
    mut fetch_fn: F,
    page_size: usize,
    max_batches: Option<u32>,
) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(usize, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut items = Vec::new();
    let mut cursor = None;
    let mut batches = 0u32;

    loop {
        if let Some(max) = max_batches {
            if batches >= max {
                log::debug!("Reached maximum batch limit: {}", max);
                break;
            }
        }

        let response = fetch_fn(page_size, cursor).await?;

        cursor = response.next_cursor;
        items.extend(response.results);
        batches += 1;

        if !response.has_more || cursor.is_none() {
            break;
        }
    }

    Ok(PaginationResult { items, batches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn batch(results: Vec<u32>, next: Option<&str>) -> PaginatedResponse<u32> {
        PaginatedResponse {
            object: "list".to_string(),
            results,
            has_more: next.is_some(),
            next_cursor: next.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_follows_cursor_until_exhausted() {
        let seen = Mutex::new(Vec::new());
        let seen_ref = &seen;

        let result = fetch_all_pages(
            move |size, cursor| async move {
                seen_ref.lock().unwrap().push((size, cursor.clone()));
                Ok(match cursor.as_deref() {
                    None => batch(vec![1, 2], Some("c1")),
                    Some("c1") => batch(vec![3], Some("c2")),
                    _ => batch(vec![4], None),
                })
            },
            100,
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.items, vec![1, 2, 3, 4]);
        assert_eq!(result.batches, 3);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (100, None),
                (100, Some("c1".to_string())),
                (100, Some("c2".to_string()))
            ]
        );
    }

    #[tokio::test]
    async fn test_stops_at_batch_limit() {
        let result = fetch_all_pages(
            |_, _| async { Ok(batch(vec![7], Some("more"))) },
            5,
            Some(1),
        )
        .await
        .unwrap();

        assert_eq!(result.items, vec![7]);
        assert_eq!(result.batches, 1);
    }

    #[tokio::test]
    async fn test_error_aborts() {
        let result: Result<PaginationResult<u32>, _> = fetch_all_pages(
            |_, _| async { Err(AppError::MalformedResponse("bad".into())) },
            100,
            None,
        )
        .await;
        assert!(result.is_err());
    }
}
