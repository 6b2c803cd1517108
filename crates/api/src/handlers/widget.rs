//! Widget configuration served to the storefront.

use axum::extract::State;
use axum::Json;

use crate::config::WidgetConfig;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/widget/config
pub async fn get_widget_config(State(state): State<AppState>) -> Json<DataResponse<WidgetConfig>> {
    Json(DataResponse {
        data: state.instavid.widget_config(),
    })
}
