use crate::config::Config;
use database::mongodb::Client;
use domain_users::{MongoUserRepository, UserService};

/// Shared application state handed to the routers.
///
/// Cloning is cheap: the Mongo client and the service's repository are
/// reference-counted handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub mongo: Client,
    pub users: UserService<MongoUserRepository>,
}
