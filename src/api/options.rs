use axum::{Json, extract::State};
use std::sync::Arc;

use super::{
    ApiResponse, AppState, BoundsDto, ChoiceDto, OptionsDto, RangeDto, SiteOptionDto,
};
use crate::models::{Country, JobType, Site};
use crate::services::form::{
    DISTANCE_RANGE, HOURS_OLD_RANGE, RESULTS_WANTED_RANGE, SearchForm,
};

fn range(r: &std::ops::RangeInclusive<u32>) -> RangeDto {
    RangeDto {
        min: *r.start(),
        max: *r.end(),
    }
}

/// `GET /api/options`
///
/// Everything the search form needs to render: choices, defaults and bounds.
pub async fn get_options(State(state): State<Arc<AppState>>) -> Json<ApiResponse<OptionsDto>> {
    let sites = Site::ALL
        .into_iter()
        .map(|site| SiteOptionDto {
            id: site.as_str(),
            label: site.label(),
            selected_by_default: state.config().search.sites.contains(&site),
            only_countries: (site == Site::ZipRecruiter).then(|| {
                vec![Country::USA.display_name(), Country::CANADA.display_name()]
            }),
        })
        .collect();

    let job_types = std::iter::once(ChoiceDto {
        id: "any",
        label: "Any",
    })
    .chain(JobType::ALL.into_iter().map(|t| ChoiceDto {
        id: t.as_str(),
        label: t.label(),
    }))
    .collect();

    Json(ApiResponse::success(OptionsDto {
        sites,
        countries: Country::all().iter().map(Country::display_name).collect(),
        job_types,
        defaults: SearchForm::from_defaults(&state.config().search),
        bounds: BoundsDto {
            results_wanted: range(&RESULTS_WANTED_RANGE),
            hours_old: range(&HOURS_OLD_RANGE),
            distance: range(&DISTANCE_RANGE),
        },
    }))
}
