//! PROPFIND verb.
//!
//! Success is a `207 Multi-Status` XML document; an empty listing is a
//! `404` with a small HTML page instead. Clients depend on that split.

use async_trait::async_trait;
use http::StatusCode;
use http::header::{CACHE_CONTROL, CONTENT_TYPE, HeaderName, HeaderValue};
use std::sync::Arc;
use tracing::debug;

use super::backend::{DavBackend, DavResource, Depth};
use super::xml::{DAV_NS, XmlOut, parse_document};
use super::{DavHandler, DavRequest, DavResponse};
use crate::error::DavError;

/// Properties the backend can answer, in output order.
pub const KNOWN_PROPS: &[&str] = &[
    "displayname",
    "creationdate",
    "getlastmodified",
    "getcontentlength",
    "getcontenttype",
    "resourcetype",
];

const MS_DATATYPES_NS: &str = "urn:uuid:c2f41010-65b3-11d1-a29f-00aa00c14882";
const MS_OFFICE_NS: &str = "urn:schemas-microsoft-com:office:office";

pub const NOT_FOUND_PAGE: &str =
    "<html><head><title>Page Not Found</title></head><body><h3>Not Found</h3></body></html>";

const DAV: HeaderName = HeaderName::from_static("dav");
const MS_AUTHOR_VIA: HeaderName = HeaderName::from_static("ms-author-via");

/// A property named under `DAV:prop`.
///
/// `DAV:` names are lower-cased so lookups ignore case. Foreign names keep
/// their namespace and spelling so they can be echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedProp {
    pub namespace: Option<String>,
    pub name: String,
}

impl RequestedProp {
    pub fn dav(name: &str) -> Self {
        Self {
            namespace: Some(DAV_NS.to_string()),
            name: name.to_ascii_lowercase(),
        }
    }

    fn is_dav(&self) -> bool {
        self.namespace.as_deref() == Some(DAV_NS)
    }

    /// Write the property as an empty element, declaring its own namespace
    /// when it is not `DAV:`.
    fn write_empty(&self, out: &mut XmlOut) -> Result<(), DavError> {
        match self.namespace.as_deref() {
            Some(DAV_NS) => out.empty(&format!("D:{}", self.name)),
            Some(ns) => out.empty_with(&format!("x:{}", self.name), &[("xmlns:x", ns)]),
            None => out.empty(&self.name),
        }
    }
}

/// Properties under `DAV:prop`. Empty means all properties.
pub fn parse_requested_props(body: &[u8]) -> Result<Vec<RequestedProp>, DavError> {
    let Some(root) = parse_document(body)? else {
        return Ok(Vec::new());
    };
    Ok(root
        .find(DAV_NS, "prop")
        .map(|prop| {
            prop.elements()
                .map(|el| match el.namespace.as_deref() {
                    Some(DAV_NS) => RequestedProp::dav(&el.local_name),
                    _ => RequestedProp {
                        namespace: el.namespace.clone(),
                        name: el.local_name.clone(),
                    },
                })
                .collect()
        })
        .unwrap_or_default())
}

fn has_prop(resource: &DavResource, prop: &RequestedProp) -> bool {
    if !prop.is_dav() {
        return false;
    }
    match prop.name.as_str() {
        "getcontentlength" | "getcontenttype" => !resource.collection,
        name => KNOWN_PROPS.contains(&name),
    }
}

fn write_prop(out: &mut XmlOut, resource: &DavResource, name: &str) -> Result<(), DavError> {
    match name {
        "displayname" => out.text_element("D:displayname", &[], resource.display_name()),
        "creationdate" => out.text_element(
            "D:creationdate",
            &[("b:dt", "dateTime.tz")],
            &resource.created.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        ),
        "getlastmodified" => out.text_element(
            "D:getlastmodified",
            &[("b:dt", "dateTime.rfc1123")],
            &resource.modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        ),
        "getcontentlength" => out.text_element(
            "D:getcontentlength",
            &[("b:dt", "int")],
            &resource.content_length.to_string(),
        ),
        "getcontenttype" => out.text_element(
            "D:getcontenttype",
            &[],
            resource
                .content_type
                .as_deref()
                .unwrap_or("application/octet-stream"),
        ),
        "resourcetype" if resource.collection => {
            out.start("D:resourcetype", &[])?;
            out.empty("D:collection")?;
            out.end("D:resourcetype")
        }
        "resourcetype" => out.empty("D:resourcetype"),
        other => out.empty(&format!("D:{}", other)),
    }
}

fn write_propstat(
    out: &mut XmlOut,
    resource: &DavResource,
    props: &[RequestedProp],
    status: &str,
    with_values: bool,
) -> Result<(), DavError> {
    out.start("D:propstat", &[])?;
    out.start("D:prop", &[])?;
    for prop in props {
        if with_values {
            write_prop(out, resource, &prop.name)?;
        } else {
            prop.write_empty(out)?;
        }
    }
    out.end("D:prop")?;
    out.text_element("D:status", &[], status)?;
    out.end("D:propstat")
}

/// Serialize the multistatus document for `resources`.
pub fn render_multistatus(
    resources: &[DavResource],
    requested: &[RequestedProp],
) -> Result<Vec<u8>, DavError> {
    let mut out = XmlOut::new("utf-8")?;
    out.start(
        "D:multistatus",
        &[
            ("xmlns:D", DAV_NS),
            ("xmlns:b", MS_DATATYPES_NS),
            ("xmlns:c", MS_OFFICE_NS),
        ],
    )?;

    for resource in resources {
        let (found, missing): (Vec<RequestedProp>, Vec<RequestedProp>) = if requested.is_empty() {
            (
                KNOWN_PROPS
                    .iter()
                    .map(|name| RequestedProp::dav(name))
                    .filter(|prop| has_prop(resource, prop))
                    .collect(),
                Vec::new(),
            )
        } else {
            requested
                .iter()
                .cloned()
                .partition(|prop| has_prop(resource, prop))
        };

        out.start("D:response", &[])?;
        out.text_element("D:href", &[], &resource.path)?;
        if !found.is_empty() {
            write_propstat(&mut out, resource, &found, "HTTP/1.1 200 OK", true)?;
        }
        if !missing.is_empty() {
            write_propstat(&mut out, resource, &missing, "HTTP/1.1 404 Not Found", false)?;
        }
        out.end("D:response")?;
    }

    out.end("D:multistatus")?;
    Ok(out.into_bytes())
}

fn with_dav_headers(response: DavResponse) -> DavResponse {
    response
        .header(DAV, HeaderValue::from_static("1"))
        .header(MS_AUTHOR_VIA, HeaderValue::from_static("DAV"))
        .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
}

pub struct PropfindHandler {
    backend: Arc<dyn DavBackend>,
}

impl PropfindHandler {
    pub fn new(backend: Arc<dyn DavBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl DavHandler for PropfindHandler {
    async fn handle(&self, user: &str, request: &DavRequest) -> Result<DavResponse, DavError> {
        let requested = parse_requested_props(&request.body)?;
        let depth = Depth::from_headers(&request.headers);

        let resources = self.backend.propfind(user, &request.path, depth);
        debug!(
            path = %request.path,
            %depth,
            found = resources.len(),
            props = requested.len(),
            "PROPFIND"
        );

        if resources.is_empty() {
            return Ok(with_dav_headers(
                DavResponse::new(StatusCode::NOT_FOUND)
                    .header(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"))
                    .body(NOT_FOUND_PAGE.as_bytes().to_vec()),
            ));
        }

        let body = render_multistatus(&resources, &requested)?;
        Ok(with_dav_headers(
            DavResponse::new(StatusCode::MULTI_STATUS)
                .header(CONTENT_TYPE, HeaderValue::from_static("text/xml; charset=utf-8"))
                .body(body),
        ))
    }
}
