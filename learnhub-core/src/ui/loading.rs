use serde::Serialize;

/// Placeholder shape shown while content loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkeletonKind {
    #[default]
    Card,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LoadingState<T> {
    Loading { skeleton: SkeletonKind, count: u32 },
    Ready { value: T },
    Failed { message: String },
}

impl<T> Default for LoadingState<T> {
    fn default() -> Self {
        LoadingState::Loading {
            skeleton: SkeletonKind::Card,
            count: 1,
        }
    }
}

impl<T> LoadingState<T> {
    pub fn loading(skeleton: SkeletonKind, count: u32) -> Self {
        LoadingState::Loading {
            skeleton,
            count: count.max(1),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            LoadingState::Ready { value } => Some(value),
            _ => None,
        }
    }

    /// Settles the state from a finished request.
    pub fn settle<E: ToString>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => LoadingState::Ready { value },
            Err(err) => LoadingState::Failed {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_from_results() {
        let ready = LoadingState::<u8>::settle(Ok::<_, String>(3));
        assert_eq!(ready.value(), Some(&3));

        let failed = LoadingState::<u8>::settle(Err("No data found"));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({ "state": "failed", "message": "No data found" })
        );

        let loading = LoadingState::<u8>::loading(SkeletonKind::List, 0);
        assert!(loading.is_loading());
        assert_eq!(
            loading,
            LoadingState::Loading {
                skeleton: SkeletonKind::List,
                count: 1
            }
        );
    }
}
