//! Declarative error catalogs.
//!
//! A module lists each failure once (status, versioned code, title) and
//! [`error_catalog!`](crate::error_catalog) expands it into a `Copy` enum
//! with `ALL`, `def()`, `status()`, `to_problem()` and `to_response()`.
//! The problem `type` URL is the catalog's base URL followed by the code.
//!
//! ```ignore
//! adminkit::error_catalog! {
//!     pub enum ErrorCode from "https://errors.blogify.dev/" {
//!         blog_post_not_found_v1 => (404, "blog.post.not_found.v1", "Post Not Found"),
//!     }
//! }
//! ```

#[macro_export]
macro_rules! error_catalog {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident from $base:literal {
            $( $variant:ident => ($status:literal, $code:literal, $title:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                #[doc = $code]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn def(&self) -> $crate::ErrDef {
                match self {
                    $(
                        $name::$variant => $crate::ErrDef {
                            status: $status,
                            title: $title,
                            code: $code,
                            type_url: concat!($base, $code),
                        },
                    )+
                }
            }

            pub const fn status(&self) -> u16 {
                self.def().status
            }

            /// Problem with this code and `detail`, no request context.
            pub fn to_problem(&self, detail: impl Into<String>) -> $crate::Problem {
                self.def().to_problem(detail)
            }

            /// Problem response for the request at `instance`.
            pub fn to_response(
                &self,
                detail: impl Into<String>,
                instance: &str,
                request_id: Option<String>,
            ) -> $crate::ProblemResponse {
                self.def().respond(detail, instance, request_id)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::error_catalog! {
        enum Demo from "https://errors.blogify.dev/" {
            demo_thing_missing_v1 => (404, "demo.thing.missing.v1", "Thing Missing"),
            demo_thing_broken_v1 => (500, "demo.thing.broken.v1", "Thing Broken"),
        }
    }

    #[test]
    fn entries_expand_in_declaration_order() {
        assert_eq!(
            Demo::ALL,
            &[Demo::demo_thing_missing_v1, Demo::demo_thing_broken_v1]
        );
    }

    #[test]
    fn type_url_is_base_plus_code() {
        let def = Demo::demo_thing_missing_v1.def();
        assert_eq!(def.status, 404);
        assert_eq!(def.title, "Thing Missing");
        assert_eq!(def.code, "demo.thing.missing.v1");
        assert_eq!(def.type_url, "https://errors.blogify.dev/demo.thing.missing.v1");
    }

    #[test]
    fn response_carries_request_context() {
        let resp = Demo::demo_thing_broken_v1.to_response("boom", "/things/9", Some("req-1".into()));
        assert_eq!(resp.0.status, 500);
        assert_eq!(resp.0.code, "demo.thing.broken.v1");
        assert_eq!(resp.0.instance, "/things/9");
        assert_eq!(resp.0.request_id.as_deref(), Some("req-1"));
    }
}
