use anyhow::Context;
use hyper::Uri;
use indexmap::IndexMap;

/// Raw, multi-valued request parameters.
///
/// Keeps names in arrival order and every value supplied for a name.
/// Built once per request and only read while binding.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParameterSource {
    params: IndexMap<String, Vec<String>>,
}

impl ParameterSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `application/x-www-form-urlencoded` input, e.g. a query string
    /// without the leading '?'.
    ///
    /// ```rust
    /// use rbind_core::source::ParameterSource;
    ///
    /// let source = ParameterSource::parse("username=kim&age=20&age=30").unwrap();
    /// assert_eq!(source.first("age"), Some("20"));
    /// assert_eq!(source.values("age"), ["20", "30"]);
    /// ```
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let mut source = Self::new();
        source.extend_from_urlencoded(input)?;
        Ok(source)
    }

    /// Parses query part of given uri, uri without query gives empty source.
    pub fn from_uri(uri: &Uri) -> anyhow::Result<Self> {
        Self::parse(uri.query().unwrap_or_default())
    }

    /// Appends every pair from urlencoded input, keeps already stored values.
    pub fn extend_from_urlencoded(&mut self, input: &str) -> anyhow::Result<()> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(input)
            .with_context(|| format!("could not decode parameters: {:?}", input))?;

        for (name, value) in pairs {
            self.append(name, value);
        }
        Ok(())
    }

    /// Adds single value for given name.
    pub fn append<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.params
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Returns first value supplied for given name.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    /// Returns every value supplied for given name, empty slice if none.
    pub fn values(&self, name: &str) -> &[String] {
        self.params
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates over names and all of their values, in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl<N, V> FromIterator<(N, V)> for ParameterSource
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (name, value) in iter {
            source.append(name, value);
        }
        source
    }
}
