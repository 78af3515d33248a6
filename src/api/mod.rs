use rocket::Route;

mod accounting;
mod election;
mod learning;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(election::routes());
    routes.extend(learning::routes());
    routes.extend(accounting::routes());
    routes
}
