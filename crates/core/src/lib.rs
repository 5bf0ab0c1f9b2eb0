pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod region;
}

pub mod capture {
    pub mod domain {
        pub mod frame_source;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod classifier;
    }
    pub mod infrastructure;
}

pub mod annotation {
    pub mod domain {
        pub mod frame_painter;
    }
    pub mod infrastructure {
        pub mod font_resolver;
        pub mod raster_painter;
    }
}

pub mod snapshot {
    pub mod domain {
        pub mod image_writer;
        pub mod snapshot_format;
    }
    pub mod infrastructure {
        pub mod image_file_writer;
    }
}

pub mod pipeline {
    pub mod annotate_faces_use_case;
}

pub mod session {
    pub mod capture_session;
    pub mod session_error;
    pub mod status;
    pub mod tick_scheduler;
}

#[cfg(test)]
mod testing;
