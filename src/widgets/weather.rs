//! Weather card. Hidden unless a city is configured and the backend
//! answers with a well-formed snapshot.

use crate::api::functions;
use crate::state::DashboardState;
use crate::types::WeatherSnapshot;

pub async fn load(state: &DashboardState) -> Option<WeatherSnapshot> {
    let city = state.config.city.as_deref()?;
    let gateway = state.functions()?;
    functions::weather(gateway, city).await
}
