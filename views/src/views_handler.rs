use crate::{Bindings, ViewEngine};
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};
use trillium::{Conn, Handler};

/**
A trillium handler that makes a [`ViewEngine`] and a fresh set of
[`Bindings`] available to downsequence handlers through
[`ViewsConnExt`](crate::ViewsConnExt)
*/
#[derive(Clone)]
pub struct ViewsHandler(Arc<dyn ViewEngine>);

impl ViewsHandler {
    /// Builds a new ViewsHandler from any [`ViewEngine`], typically a
    /// [`Views`](crate::Views)
    pub fn new(engine: impl ViewEngine) -> Self {
        Self(Arc::new(engine))
    }

    pub(crate) fn engine(&self) -> &dyn ViewEngine {
        &*self.0
    }
}

impl From<Arc<dyn ViewEngine>> for ViewsHandler {
    fn from(engine: Arc<dyn ViewEngine>) -> Self {
        Self(engine)
    }
}

impl Debug for ViewsHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ViewsHandler")
            .field(&self.0.functions())
            .finish()
    }
}

#[trillium::async_trait]
impl Handler for ViewsHandler {
    async fn run(&self, conn: Conn) -> Conn {
        conn.with_state(self.clone()).with_state(Bindings::new())
    }
}
