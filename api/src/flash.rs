use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};

#[derive(Deserialize)]
struct ValuedMessage<T> {
    #[serde(rename = "_")]
    value: T,
}

#[derive(Serialize)]
struct ValuedMessageRef<'a, T> {
    #[serde(rename = "_")]
    value: &'a T,
}

const FLASH_COOKIE_NAME: &str = "_flash";

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FlashData {
    pub kind: String,
    pub message: String,
}

impl FlashData {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: "success".to_owned(),
            message: message.into(),
        }
    }
}

/// Reads and clears the flash cookie, so the message shows once.
pub fn get_flash_cookie<T>(cookies: &Cookies) -> Option<T>
where
    T: DeserializeOwned,
{
    let flash_cookie = cookies.get(FLASH_COOKIE_NAME)?;
    let ValuedMessage::<T> { value } = serde_json::from_str(flash_cookie.value()).ok()?;

    let mut removal = Cookie::new(FLASH_COOKIE_NAME, "");
    removal.set_path("/");
    cookies.remove(removal);

    Some(value)
}

pub type PostResponse = (StatusCode, HeaderMap);

/// Sets the flash cookie and redirects to `location`.
pub fn post_response<T>(cookies: &mut Cookies, data: T, location: &str) -> PostResponse
where
    T: Serialize,
{
    let valued_message_ref = ValuedMessageRef { value: &data };

    let mut cookie = Cookie::new(
        FLASH_COOKIE_NAME,
        serde_json::to_string(&valued_message_ref).unwrap(),
    );
    cookie.set_path("/");
    cookies.add(cookie);

    let mut header = HeaderMap::new();
    header.insert(
        header::LOCATION,
        HeaderValue::from_str(location).expect("redirect target is always ASCII"),
    );

    (StatusCode::SEE_OTHER, header)
}
