/// Embedded browsers of messenger and social apps. Geolocation and
/// clipboard are unreliable inside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InAppBrowser {
    KakaoTalk,
    Instagram,
    Facebook,
    Line,
    Naver,
    Daum,
    Everytime,
}

impl InAppBrowser {
    pub fn detect(user_agent: &str) -> Option<Self> {
        let ua = user_agent.to_lowercase();
        if ua.contains("kakaotalk") {
            Some(InAppBrowser::KakaoTalk)
        } else if ua.contains("instagram") {
            Some(InAppBrowser::Instagram)
        } else if ua.contains("fban") || ua.contains("fbav") {
            Some(InAppBrowser::Facebook)
        } else if ua.contains(" line/") {
            Some(InAppBrowser::Line)
        } else if ua.contains("naver(inapp") {
            Some(InAppBrowser::Naver)
        } else if ua.contains("daumapps") {
            Some(InAppBrowser::Daum)
        } else if ua.contains("everytimeapp") {
            Some(InAppBrowser::Everytime)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InAppBrowser::KakaoTalk => "kakaotalk",
            InAppBrowser::Instagram => "instagram",
            InAppBrowser::Facebook => "facebook",
            InAppBrowser::Line => "line",
            InAppBrowser::Naver => "naver",
            InAppBrowser::Daum => "daum",
            InAppBrowser::Everytime => "everytime",
        }
    }

    /// URL that reopens `page_url` in the system browser, where the app
    /// offers one.
    pub fn escape_url(&self, page_url: &str) -> Option<String> {
        match self {
            InAppBrowser::KakaoTalk => Some(format!(
                "kakaotalk://web/openExternal?url={}",
                urlencoding::encode(page_url)
            )),
            InAppBrowser::Line => {
                let separator = if page_url.contains('?') { '&' } else { '?' };
                Some(format!("{}{}openExternalBrowser=1", page_url, separator))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_common_in_app_browsers() {
        let kakao = "Mozilla/5.0 (Linux; Android 13) AppleWebKit/537.36 Chrome/116.0 Mobile Safari/537.36 KAKAOTALK 10.3.5";
        assert_eq!(InAppBrowser::detect(kakao), Some(InAppBrowser::KakaoTalk));
        let insta = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148 Instagram 300.0.0";
        assert_eq!(InAppBrowser::detect(insta), Some(InAppBrowser::Instagram));
        let fb = "Mozilla/5.0 (iPhone) [FBAN/FBIOS;FBAV/420.0]";
        assert_eq!(InAppBrowser::detect(fb), Some(InAppBrowser::Facebook));
        let line = "Mozilla/5.0 (iPhone) Mobile/15E148 Safari Line/13.1.0";
        assert_eq!(InAppBrowser::detect(line), Some(InAppBrowser::Line));
    }

    #[test]
    fn test_regular_browsers_pass() {
        let chrome = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";
        assert_eq!(InAppBrowser::detect(chrome), None);
        let safari = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Version/17.0 Mobile/15E148 Safari/604.1";
        assert_eq!(InAppBrowser::detect(safari), None);
    }

    #[test]
    fn test_escape_urls() {
        assert_eq!(
            InAppBrowser::KakaoTalk.escape_url("https://handsfree.kr/?v=1").as_deref(),
            Some("kakaotalk://web/openExternal?url=https%3A%2F%2Fhandsfree.kr%2F%3Fv%3D1")
        );
        assert_eq!(
            InAppBrowser::Line.escape_url("https://handsfree.kr/").as_deref(),
            Some("https://handsfree.kr/?openExternalBrowser=1")
        );
        assert_eq!(InAppBrowser::Instagram.escape_url("https://handsfree.kr/"), None);
    }
}
