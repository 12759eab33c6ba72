//! The dispatch loop.
//!
//! A [`Runtime`] owns the application state, the renderer, and the mirror of
//! what is currently rendered. Each dispatched message runs through
//! `update`, schedules a render pass, then runs the returned effects.
//!
//! Messages sent while the runtime is already processing (from effects, from
//! subscriptions activated during a render, or during a deferred render) are
//! queued and drained in a loop by the outermost call, so synchronous
//! re-dispatching never grows the stack.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::{
    application::Application,
    command::Command,
    config::{InitEffects, RuntimeConfig},
    dispatch::Dispatch,
    error::{Error, Result},
    mirror::MirrorNode,
    reconcile::reconcile,
    renderer::Renderer,
    schedule::{Immediate, RenderTask, Scheduler},
    subscription::SubscriptionManager,
    vdom::{Props, VirtualNode},
};

/// Where the rendered tree is attached.
pub enum Mount<T> {
    /// The runtime creates the root target and hands it to the callback once,
    /// after the first render.
    Sink(Box<dyn FnOnce(&T)>),

    /// The runtime renders into a root target the caller already owns.
    Existing(T),
}

impl<T> Mount<T> {
    pub fn sink(f: impl FnOnce(&T) + 'static) -> Self {
        Self::Sink(Box::new(f))
    }

    pub fn existing(target: T) -> Self {
        Self::Existing(target)
    }
}

struct Core<A: Application, R: Renderer> {
    app: A,
    renderer: R,
    root: Option<MirrorNode<R::Target>>,
    subscriptions: SubscriptionManager<A::Message>,
    renders: u64,
}

struct Shared<A: Application, R: Renderer> {
    core: RefCell<Core<A, R>>,
    queue: RefCell<VecDeque<A::Message>>,
    busy: Cell<bool>,
    scheduler: Box<dyn Scheduler>,
    config: RuntimeConfig,
    this: Weak<Self>,
}

/// Marks the runtime busy; only the guard that set the flag clears it.
struct BusyGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> BusyGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self { flag })
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl<A: Application, R: Renderer + 'static> Shared<A, R> {
    fn connect(this: Weak<Self>) -> Dispatch<A::Message> {
        Dispatch::new(move |msg| match this.upgrade() {
            Some(shared) => shared.dispatch(msg),
            None => Err(Error::Detached),
        })
    }

    fn dispatcher(&self) -> Dispatch<A::Message> {
        Self::connect(self.this.clone())
    }

    fn dispatch(&self, msg: A::Message) -> Result<()> {
        self.queue.borrow_mut().push_back(msg);
        if self.busy.get() {
            trace!(pending = self.queue.borrow().len(), "queued message");
            return Ok(());
        }
        self.drain()
    }

    /// Processes queued messages until none are left.
    ///
    /// A failed render does not stop the loop. The effects of the update that
    /// scheduled it still run, and the first error is returned once the queue
    /// is empty. While the state is borrowed elsewhere the messages stay
    /// queued and [`Error::Busy`] is returned.
    fn drain(&self) -> Result<()> {
        let Some(_busy) = BusyGuard::enter(&self.busy) else {
            return Ok(());
        };
        let dispatch = self.dispatcher();
        let mut failed = None;

        while !self.queue.borrow().is_empty() {
            let Ok(mut core) = self.core.try_borrow_mut() else {
                trace!(
                    pending = self.queue.borrow().len(),
                    "state is borrowed; messages stay queued"
                );
                return Err(failed.unwrap_or(Error::Busy));
            };
            let Some(msg) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            let command = core.app.update(msg);
            drop(core);

            let scheduled = self.scheduler.schedule(self.render_task());
            command.run(&dispatch);
            if let Err(err) = scheduled {
                warn!(%err, "render pass failed");
                failed.get_or_insert(err);
            }
        }
        failed.map_or(Ok(()), Err)
    }

    fn render_task(&self) -> RenderTask {
        let this = self.this.clone();
        RenderTask::new(move || this.upgrade().ok_or(Error::Detached)?.render())
    }

    /// A scheduled render pass. Drains messages it queued when it runs on
    /// its own rather than inside a dispatch.
    fn render(&self) -> Result<()> {
        let owner = BusyGuard::enter(&self.busy);
        self.render_pass()?;
        if let Some(owner) = owner {
            drop(owner);
            self.drain()?;
        }
        Ok(())
    }

    fn render_pass(&self) -> Result<()> {
        let mut core = self.core.try_borrow_mut().map_err(|_| Error::Busy)?;
        let core = &mut *core;

        let tree = VirtualNode::Element {
            tag: self.config.root_tag.to_string(),
            props: Props::new(),
            children: core.app.view().into_iter().collect(),
        };
        let out = reconcile(&mut core.renderer, core.root.as_ref(), Some(&tree))?;
        if !out.patches.is_empty() {
            trace!(patches = out.patches.len(), "root attached by mount");
        }
        core.root = out.mirror;
        core.renders += 1;
        debug!(render = core.renders, "render pass committed");

        let subscriptions = core.app.subscriptions();
        core.subscriptions.update(subscriptions, &self.dispatcher());
        Ok(())
    }
}

/// Runs an [`Application`] against a [`Renderer`].
///
/// # Example
///
/// ```
/// use alder::prelude::*;
/// use alder::renderer::document::Document;
///
/// struct Counter(u32);
///
/// impl Application for Counter {
///     type Message = ();
///     type Flags = ();
///
///     fn init(_: ()) -> (Self, Command<()>) {
///         (Counter(0), Command::none())
///     }
///
///     fn update(&mut self, _: ()) -> Command<()> {
///         self.0 += 1;
///         Command::none()
///     }
///
///     fn view(&self) -> Option<VirtualNode> {
///         Some(text(self.0.to_string()))
///     }
/// }
///
/// # fn main() -> Result<(), alder::error::Error> {
/// let runtime = Runtime::<Counter, Document>::start((), Document::new(), Mount::sink(|_| {}))?;
/// runtime.dispatch(())?;
/// runtime.dispatch(())?;
///
/// let root = runtime.root_target()?.expect("mounted");
/// assert_eq!(runtime.with_renderer(|doc| doc.text_content(root))?, "2");
/// # Ok(())
/// # }
/// ```
pub struct Runtime<A: Application, R: Renderer + 'static> {
    shared: Rc<Shared<A, R>>,
}

impl<A: Application, R: Renderer + 'static> Runtime<A, R> {
    /// Starts with the immediate scheduler and the default configuration.
    ///
    /// # Errors
    ///
    /// Returns the renderer's error if the first render fails, or the error of
    /// a message dispatched during startup.
    pub fn start(flags: A::Flags, renderer: R, mount: Mount<R::Target>) -> Result<Self> {
        Self::start_with(
            flags,
            renderer,
            mount,
            Immediate,
            RuntimeConfig::default(),
        )
    }

    /// Starts with an explicit scheduler and configuration.
    ///
    /// The first render always runs synchronously; the scheduler is used for
    /// the renders that follow dispatches.
    ///
    /// # Errors
    ///
    /// See [`Runtime::start`].
    pub fn start_with(
        flags: A::Flags,
        renderer: R,
        mount: Mount<R::Target>,
        scheduler: impl Scheduler + 'static,
        config: RuntimeConfig,
    ) -> Result<Self> {
        Self::start_connected(flags, move |_| renderer, mount, scheduler, config)
    }

    /// Starts with a renderer built around the runtime's dispatch handle.
    ///
    /// A renderer whose targets produce events of their own (input handlers,
    /// say) keeps the handle and feeds messages back through it. The handle
    /// is detached until `connect` returns.
    ///
    /// # Errors
    ///
    /// See [`Runtime::start`].
    pub fn start_connected(
        flags: A::Flags,
        connect: impl FnOnce(Dispatch<A::Message>) -> R,
        mount: Mount<R::Target>,
        scheduler: impl Scheduler + 'static,
        config: RuntimeConfig,
    ) -> Result<Self> {
        let (app, command) = A::init(flags);

        let (root, sink) = match mount {
            Mount::Existing(target) => (
                Some(MirrorNode::Element {
                    tag: config.root_tag.to_string(),
                    props: Props::new(),
                    children: Vec::new(),
                    target,
                }),
                None,
            ),
            Mount::Sink(sink) => (None, Some(sink)),
        };

        let shared = Rc::new_cyclic(|this: &Weak<Shared<A, R>>| Shared {
            core: RefCell::new(Core {
                app,
                renderer: connect(Shared::connect(this.clone())),
                root,
                subscriptions: SubscriptionManager::new(),
                renders: 0,
            }),
            queue: RefCell::new(VecDeque::new()),
            busy: Cell::new(false),
            scheduler: Box::new(scheduler),
            config,
            this: this.clone(),
        });
        let runtime = Self { shared };
        runtime.boot(command, sink)?;
        Ok(runtime)
    }

    fn boot(
        &self,
        command: Command<A::Message>,
        sink: Option<Box<dyn FnOnce(&R::Target)>>,
    ) -> Result<()> {
        let shared = &self.shared;
        let dispatch = shared.dispatcher();

        {
            let _busy = BusyGuard::enter(&shared.busy);
            let mut command = Some(command);
            if shared.config.init_effects == InitEffects::BeforeFirstRender {
                if let Some(command) = command.take() {
                    command.run(&dispatch);
                }
            }

            shared.render_pass()?;

            if let Some(sink) = sink {
                if let Some(target) = self.root_target()? {
                    debug!(root = ?target, "mounting");
                    sink(&target);
                }
            }

            if let Some(command) = command {
                command.run(&dispatch);
            }
        }

        shared.drain()
    }

    /// Dispatches a message and processes everything it queues.
    ///
    /// # Errors
    ///
    /// Returns the first render or renderer error once every queued message
    /// has been processed. State updates stay committed and their effects
    /// run. [`Error::Busy`] when sent from inside a `with_*` reader; the
    /// message stays queued for the next dispatch.
    pub fn dispatch(&self, msg: A::Message) -> Result<()> {
        self.shared.dispatch(msg)
    }

    /// A handle for sending messages from elsewhere.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatch<A::Message> {
        self.shared.dispatcher()
    }

    /// Reads the current state.
    ///
    /// # Errors
    ///
    /// [`Error::Busy`] while an update or render holds the state.
    pub fn with_state<T>(&self, f: impl FnOnce(&A) -> T) -> Result<T> {
        let core = self.shared.core.try_borrow().map_err(|_| Error::Busy)?;
        Ok(f(&core.app))
    }

    /// Reads the renderer.
    ///
    /// # Errors
    ///
    /// [`Error::Busy`] while an update or render holds the runtime.
    pub fn with_renderer<T>(&self, f: impl FnOnce(&R) -> T) -> Result<T> {
        let core = self.shared.core.try_borrow().map_err(|_| Error::Busy)?;
        Ok(f(&core.renderer))
    }

    /// Reads the committed mirror of the root container.
    ///
    /// # Errors
    ///
    /// [`Error::Busy`] while an update or render holds the runtime.
    pub fn with_mirror<T>(
        &self,
        f: impl FnOnce(Option<&MirrorNode<R::Target>>) -> T,
    ) -> Result<T> {
        let core = self.shared.core.try_borrow().map_err(|_| Error::Busy)?;
        Ok(f(core.root.as_ref()))
    }

    /// Target of the root container, once rendered.
    ///
    /// # Errors
    ///
    /// [`Error::Busy`] while an update or render holds the runtime.
    pub fn root_target(&self) -> Result<Option<R::Target>> {
        self.with_mirror(|root| root.map(|root| root.target().clone()))
    }

    /// Number of committed render passes, the first one included.
    ///
    /// # Errors
    ///
    /// [`Error::Busy`] while an update or render holds the runtime.
    pub fn render_count(&self) -> Result<u64> {
        let core = self.shared.core.try_borrow().map_err(|_| Error::Busy)?;
        Ok(core.renders)
    }

    /// Number of queued, unprocessed messages.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.queue.borrow().len()
    }

    /// Unsubscribes everything and removes the rendered content from the root
    /// container. Messages still queued, including those sent by unsubscribe
    /// callbacks, are dropped.
    ///
    /// # Errors
    ///
    /// [`Error::Busy`] if called from inside an update or render, or the
    /// renderer's error.
    pub fn shutdown(&self) -> Result<()> {
        let _busy = BusyGuard::enter(&self.shared.busy);
        let mut core = self.shared.core.try_borrow_mut().map_err(|_| Error::Busy)?;
        let core = &mut *core;

        core.subscriptions.shutdown();
        self.shared.queue.borrow_mut().clear();

        let empty = VirtualNode::Element {
            tag: self.shared.config.root_tag.to_string(),
            props: Props::new(),
            children: Vec::new(),
        };
        let out = reconcile(&mut core.renderer, core.root.as_ref(), Some(&empty))?;
        core.root = out.mirror;
        debug!("runtime shut down");
        Ok(())
    }
}
