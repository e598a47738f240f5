use crate::wire::HealthRes;

/// Health check shared by every HTTP entry point.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Reports liveness together with the number of loaded patients and
    /// whether AI suggestions are available.
    pub fn check_health(patients: usize, suggestions_enabled: bool) -> HealthRes {
        HealthRes {
            ok: true,
            message: "dxassist is alive".into(),
            patients,
            suggestions_enabled,
        }
    }
}
