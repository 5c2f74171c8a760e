// Catalog client behaviour against a mocked transport

use crate::client::{DeezerClient, compose_query, simplified_query};
use crate::error::VibeError;
use crate::http::{HttpRequest, HttpResponse, Method, MockHttpTransport};
use crate::models::SearchParameters;

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.deezer.com";

    fn params(query: &str, bpm_min: Option<u32>, bpm_max: Option<u32>) -> SearchParameters {
        SearchParameters {
            query: query.to_string(),
            bpm_min,
            bpm_max,
            genre_id: None,
            explanation: "Picked from the vibe".to_string(),
        }
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    fn track_json(id: u64, title: &str, artist: &str) -> String {
        format!(
            r#"{{"id":{id},"title":"{title}","duration":180,"rank":500000,"preview":"https://p/{id}.mp3","artist":{{"id":1,"name":"{artist}"}},"album":{{"id":2,"title":"A","cover_medium":"https://c/{id}.jpg"}}}}"#
        )
    }

    fn search_body(tracks: &[String]) -> String {
        format!(r#"{{"data":[{}],"total":{}}}"#, tracks.join(","), tracks.len())
    }

    fn is_search_for(req: &HttpRequest, encoded_query: &str) -> bool {
        req.method == Method::Get
            && req.url == format!("{BASE}/search?q={encoded_query}&limit=15")
    }

    #[test]
    fn test_compose_query_without_bounds() {
        assert_eq!(
            compose_query(&params("glaive hyperpop", None, None)).as_deref(),
            Some("glaive hyperpop")
        );
    }

    #[test]
    fn test_compose_query_with_both_bounds() {
        assert_eq!(
            compose_query(&params("energetic synthwave", Some(130), Some(170))).as_deref(),
            Some("energetic synthwave bpm_min:130 bpm_max:170")
        );
    }

    #[test]
    fn test_compose_query_with_single_bound() {
        let min_only = compose_query(&params("chill lofi", Some(80), None)).unwrap();
        assert_eq!(min_only, "chill lofi bpm_min:80");
        assert!(!min_only.contains("bpm_max"));

        let max_only = compose_query(&params("chill lofi", None, Some(110))).unwrap();
        assert_eq!(max_only, "chill lofi bpm_max:110");
        assert!(!max_only.contains("bpm_min"));
    }

    #[test]
    fn test_compose_query_trims_and_rejects_blank() {
        assert_eq!(
            compose_query(&params("  japanese rock  ", None, None)).as_deref(),
            Some("japanese rock")
        );
        assert_eq!(compose_query(&params("   ", Some(120), None)), None);
    }

    #[test]
    fn test_simplified_query_keeps_three_tokens() {
        assert_eq!(
            simplified_query("xyzzy nonexistent artist query"),
            "xyzzy nonexistent artist"
        );
        assert_eq!(simplified_query("  late   night\tfocus synthwave "), "late night focus");
        assert_eq!(simplified_query("glaive"), "glaive");
    }

    #[test]
    fn test_empty_query_issues_no_request() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().never();
        let client = DeezerClient::new(transport, BASE);

        let tracks = client.search(&params("  \t ", Some(130), None), 15).unwrap();
        assert!(tracks.is_empty());

        let outcome = client.search_with_fallback(&params("", None, None), 15).unwrap();
        assert!(outcome.tracks.is_empty());
        assert!(outcome.simplified_query.is_none());
    }

    #[test]
    fn test_search_encodes_query_and_limit() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                is_search_for(req, "energetic%20synthwave%20bpm_min%3A130%20bpm_max%3A170")
            })
            .times(1)
            .returning(|_| Ok(ok(&search_body(&[track_json(1, "Nightcall", "Kavinsky")]))));
        let client = DeezerClient::new(transport, format!("{BASE}/"));

        let tracks = client
            .search(&params("energetic synthwave", Some(130), Some(170)), 15)
            .unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].artist.name, "Kavinsky");
    }

    #[test]
    fn test_non_success_status_is_remote_service_error() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 503,
                body: "upstream down".to_string(),
            })
        });
        let client = DeezerClient::new(transport, BASE);

        match client.search_with_fallback(&params("glaive hyperpop", None, None), 15) {
            Err(VibeError::RemoteService { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected RemoteService error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_body_is_empty_result() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| is_search_for(req, "glaive"))
            .times(1)
            .returning(|_| Ok(ok(r#"{"error":{"type":"Exception","message":"Quota limit exceeded","code":4}}"#)));
        let client = DeezerClient::new(transport, BASE);

        assert!(client.search(&params("glaive", None, None), 15).unwrap().is_empty());
    }

    #[test]
    fn test_html_body_is_empty_result() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| is_search_for(req, "glaive"))
            .times(1)
            .returning(|_| Ok(ok("<html><body>Service Unavailable</body></html>")));
        let client = DeezerClient::new(transport, BASE);

        assert!(client.search(&params("glaive", None, None), 15).unwrap().is_empty());
    }

    #[test]
    fn test_data_object_is_empty_result() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| is_search_for(req, "glaive"))
            .times(1)
            .returning(|_| Ok(ok(r#"{"data":{"id":1},"total":1}"#)));
        let client = DeezerClient::new(transport, BASE);

        assert!(client.search(&params("glaive", None, None), 15).unwrap().is_empty());
    }

    #[test]
    fn test_null_preview_keeps_track() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| is_search_for(req, "glaive"))
            .times(1)
            .returning(|_| {
                let no_preview = r#"{"id":8,"title":"Bits","preview":null,"artist":{"id":1,"name":"glaive"},"album":{"id":2,"title":null}}"#;
                Ok(ok(&search_body(&[
                    track_json(7, "Astrid", "glaive"),
                    no_preview.to_string(),
                ])))
            });
        let client = DeezerClient::new(transport, BASE);

        let tracks = client.search(&params("glaive", None, None), 15).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].id, 8);
        assert_eq!(tracks[1].preview, "");
    }

    #[test]
    fn test_fallback_uses_first_three_tokens() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| is_search_for(req, "xyzzy%20nonexistent%20artist%20query%20bpm_min%3A100"))
            .times(1)
            .returning(|_| Ok(ok(r#"{"data":[],"total":0}"#)));
        transport
            .expect_send()
            .withf(|req| is_search_for(req, "xyzzy%20nonexistent%20artist"))
            .times(1)
            .returning(|_| Ok(ok(&search_body(&[track_json(7, "Found", "Someone")]))));
        let client = DeezerClient::new(transport, BASE);

        let outcome = client
            .search_with_fallback(&params("xyzzy nonexistent artist query", Some(100), None), 15)
            .unwrap();
        assert_eq!(outcome.tracks.len(), 1);
        assert_eq!(outcome.simplified_query.as_deref(), Some("xyzzy nonexistent artist"));
    }

    #[test]
    fn test_fallback_without_results_reports_no_simplification() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(2)
            .returning(|_| Ok(ok(r#"{"data":[],"total":0}"#)));
        let client = DeezerClient::new(transport, BASE);

        let outcome = client
            .search_with_fallback(&params("xyzzy nonexistent artist query", None, None), 15)
            .unwrap();
        assert!(outcome.tracks.is_empty());
        assert!(outcome.simplified_query.is_none());
    }

    #[test]
    fn test_results_on_first_attempt_skip_fallback() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(ok(&search_body(&[track_json(1, "a", "b"), track_json(2, "c", "d")]))));
        let client = DeezerClient::new(transport, BASE);

        let outcome = client
            .search_with_fallback(&params("glaive hyperpop", None, None), 15)
            .unwrap();
        assert_eq!(outcome.tracks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(outcome.simplified_query.is_none());
    }

    #[test]
    fn test_create_playlist_and_add_tracks() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.method == Method::Post
                    && req.url == format!("{BASE}/user/me/playlists?access_token=tok&title=Pilot%3A%20rainy%20day")
            })
            .times(1)
            .returning(|_| Ok(ok(r#"{"id":908622995}"#)));
        transport
            .expect_send()
            .withf(|req| {
                req.method == Method::Post
                    && req.url == format!("{BASE}/playlist/908622995/tracks?access_token=tok&songs=3%2C5%2C8")
            })
            .times(1)
            .returning(|_| Ok(ok("true")));
        let client = DeezerClient::new(transport, BASE);

        let playlist = client.create_playlist("tok", "Pilot: rainy day").unwrap();
        assert_eq!(playlist.id, 908622995);
        assert_eq!(playlist.link, "https://www.deezer.com/playlist/908622995");

        client.add_tracks("tok", playlist.id, &[3, 5, 8]).unwrap();
    }

    #[test]
    fn test_deezer_error_body_fails_playlist_creation() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Ok(ok(r#"{"error":{"type":"OAuthException","message":"Invalid OAuth access token.","code":300}}"#))
        });
        let client = DeezerClient::new(transport, BASE);

        match client.create_playlist("expired", "Pilot: x") {
            Err(VibeError::RemoteService { status, body }) => {
                assert_eq!(status, 200);
                assert!(body.contains("OAuthException"));
            }
            other => panic!("expected RemoteService error, got {other:?}"),
        }
    }

    #[test]
    fn test_add_no_tracks_skips_request() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().never();
        let client = DeezerClient::new(transport, BASE);

        client.add_tracks("tok", 1, &[]).unwrap();
    }

    #[test]
    fn test_current_user_profile() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| req.url == format!("{BASE}/user/me?access_token=tok"))
            .times(1)
            .returning(|_| Ok(ok(r#"{"id":42,"name":"listener","email":"me@example.com"}"#)));
        let client = DeezerClient::new(transport, BASE);

        let user = client.current_user("tok").unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.history_key(), "me@example.com");
    }
}
