use crate::{
    error::ApiError,
    spotify::client::{SpotifyClient, check_status},
    types::UserProfile,
};

impl SpotifyClient {
    /// Profile of the logged-in user.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let url = self.url("/me");

        let response = self.send_authorized(|http| http.get(&url)).await?;
        Ok(check_status(response)?.json::<UserProfile>().await?)
    }
}
